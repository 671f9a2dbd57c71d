//! # Order Repository
//!
//! Database operations for orders, including the transactional conversion
//! of a cart into an order at checkout.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create_from_cart (single transaction)                   │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO orders       (priced totals frozen)                     │
//! │    INSERT INTO order_lines  (name + unit price snapshots)              │
//! │    DELETE FROM carts        (lines cascade)                            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls the whole thing back: the cart survives intact      │
//! │  and no half-written order exists.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use souk_core::{Order, OrderLine, OrderStatus};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order with its lines and deletes the source cart,
    /// atomically.
    ///
    /// The caller (CheckoutService) builds the order and snapshot lines from
    /// the priced cart; this method only guarantees all-or-nothing storage.
    pub async fn create_from_cart(
        &self,
        order: &Order,
        lines: &[OrderLine],
        cart_id: &str,
    ) -> DbResult<()> {
        debug!(order_id = %order.id, cart_id = %cart_id, lines = lines.len(), "Placing order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, transaction_id, status, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.transaction_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, product_id, name_snapshot,
                    unit_price_cents, quantity, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(&line.product_id)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        // Lines cascade via FK
        sqlx::query("DELETE FROM carts WHERE id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(order_id = %order.id, total_cents = order.total_cents, "Order placed");
        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, transaction_id, status, total_cents, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Fetches the lines of an order.
    pub async fn lines_for_order(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, name_snapshot,
                   unit_price_cents, quantity, line_total_cents, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, transaction_id, status, total_cents, created_at
            FROM orders
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Updates an order's status (payment confirmation).
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = %id, status = ?status, "Updating order status");

        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
