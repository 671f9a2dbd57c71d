//! # Cart Repository
//!
//! Database operations for carts and their lines.
//!
//! ## Upsert Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Adding a Product Already in the Cart                       │
//! │                                                                         │
//! │  add (cart-1, prod-A, qty 2)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart_lines: [ (cart-1, prod-A, 2) ]                                   │
//! │                                                                         │
//! │  add (cart-1, prod-A, qty 5)   ← same product again                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart_lines: [ (cart-1, prod-A, 5) ]   ← REPLACED, not 7, not 2 rows   │
//! │                                                                         │
//! │  Enforced by UNIQUE(cart_id, product_id) + ON CONFLICT DO UPDATE.      │
//! │  Concurrent adds race on who writes last; a single line always wins.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use souk_core::{Cart, CartLine, Product};

/// Row shape for the cart-line ⋈ product join.
///
/// Columns are aliased with `line_` / `product_` prefixes to avoid clashes
/// between the two tables' `id` and `created_at` columns.
#[derive(Debug, sqlx::FromRow)]
struct LineWithProductRow {
    line_id: String,
    line_cart_id: String,
    line_product_id: String,
    line_quantity: i64,
    line_created_at: chrono::DateTime<Utc>,

    product_id: String,
    product_name: String,
    product_price_cents: i64,
    product_promo_price_cents: Option<i64>,
    product_promo_starts_on: Option<chrono::NaiveDate>,
    product_promo_ends_on: Option<chrono::NaiveDate>,
    product_is_active: bool,
    product_created_at: chrono::DateTime<Utc>,
    product_updated_at: chrono::DateTime<Utc>,
}

impl LineWithProductRow {
    fn split(self) -> (CartLine, Product) {
        (
            CartLine {
                id: self.line_id,
                cart_id: self.line_cart_id,
                product_id: self.line_product_id,
                quantity: self.line_quantity,
                created_at: self.line_created_at,
            },
            Product {
                id: self.product_id,
                name: self.product_name,
                price_cents: self.product_price_cents,
                promo_price_cents: self.product_promo_price_cents,
                promo_starts_on: self.product_promo_starts_on,
                promo_ends_on: self.product_promo_ends_on,
                is_active: self.product_is_active,
                created_at: self.product_created_at,
                updated_at: self.product_updated_at,
            },
        )
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets a cart by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, customer_id, session_key, coupon_id, created_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Gets the customer's open cart, creating one if none exists.
    ///
    /// A customer has at most one open cart (unique index on customer_id).
    pub async fn get_or_create_for_customer(&self, customer_id: &str) -> DbResult<Cart> {
        if let Some(cart) = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, customer_id, session_key, coupon_id, created_at
            FROM carts
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(cart);
        }

        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            customer_id: Some(customer_id.to_string()),
            session_key: None,
            coupon_id: None,
            created_at: Utc::now(),
        };

        debug!(cart_id = %cart.id, customer_id = %customer_id, "Creating cart");

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, session_key, coupon_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.customer_id)
        .bind(&cart.session_key)
        .bind(&cart.coupon_id)
        .bind(cart.created_at)
        .execute(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Gets the anonymous session's open cart, creating one if none exists.
    pub async fn get_or_create_for_session(&self, session_key: &str) -> DbResult<Cart> {
        if let Some(cart) = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, customer_id, session_key, coupon_id, created_at
            FROM carts
            WHERE session_key = ?1
            "#,
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(cart);
        }

        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            customer_id: None,
            session_key: Some(session_key.to_string()),
            coupon_id: None,
            created_at: Utc::now(),
        };

        debug!(cart_id = %cart.id, "Creating session cart");

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, session_key, coupon_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.customer_id)
        .bind(&cart.session_key)
        .bind(&cart.coupon_id)
        .bind(cart.created_at)
        .execute(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Inserts or replaces a cart line.
    ///
    /// If the (cart, product) pair already has a line, its quantity is
    /// REPLACED with the new value (not accumulated). This is the single
    /// write path for lines, so a pair can never hold two rows.
    pub async fn upsert_line(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<CartLine> {
        debug!(cart_id = %cart_id, product_id = %product_id, quantity, "Upserting cart line");

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cart_lines (id, cart_id, product_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(&id)
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        // Re-read: on conflict the surviving row keeps its original id
        let line = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT id, cart_id, product_id, quantity, created_at
            FROM cart_lines
            WHERE cart_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(line)
    }

    /// Removes a product's line from the cart.
    ///
    /// Idempotent: removing a product that is not in the cart succeeds and
    /// reports `false` (no row deleted).
    pub async fn delete_line(&self, cart_id: &str, product_id: &str) -> DbResult<bool> {
        debug!(cart_id = %cart_id, product_id = %product_id, "Deleting cart line");

        let result = sqlx::query(
            r#"
            DELETE FROM cart_lines
            WHERE cart_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetches all lines of a cart joined with their products.
    ///
    /// One query instead of a lookup per line; ordered by insertion time so
    /// the cart view is stable across reads.
    pub async fn lines_with_products(&self, cart_id: &str) -> DbResult<Vec<(CartLine, Product)>> {
        let rows = sqlx::query_as::<_, LineWithProductRow>(
            r#"
            SELECT
                l.id          AS line_id,
                l.cart_id     AS line_cart_id,
                l.product_id  AS line_product_id,
                l.quantity    AS line_quantity,
                l.created_at  AS line_created_at,
                p.id          AS product_id,
                p.name        AS product_name,
                p.price_cents AS product_price_cents,
                p.promo_price_cents AS product_promo_price_cents,
                p.promo_starts_on   AS product_promo_starts_on,
                p.promo_ends_on     AS product_promo_ends_on,
                p.is_active   AS product_is_active,
                p.created_at  AS product_created_at,
                p.updated_at  AS product_updated_at
            FROM cart_lines l
            INNER JOIN products p ON p.id = l.product_id
            WHERE l.cart_id = ?1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LineWithProductRow::split).collect())
    }

    /// Counts the lines in a cart.
    pub async fn line_count(&self, cart_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_lines WHERE cart_id = ?1")
            .bind(cart_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Attaches a coupon to the cart (or detaches with `None`).
    pub async fn set_coupon(&self, cart_id: &str, coupon_id: Option<&str>) -> DbResult<()> {
        debug!(cart_id = %cart_id, coupon_id = ?coupon_id, "Setting cart coupon");

        let result = sqlx::query("UPDATE carts SET coupon_id = ?2 WHERE id = ?1")
            .bind(cart_id)
            .bind(coupon_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", cart_id));
        }

        Ok(())
    }

    /// Deletes a cart. Lines cascade.
    pub async fn delete(&self, cart_id: &str) -> DbResult<()> {
        debug!(cart_id = %cart_id, "Deleting cart");

        sqlx::query("DELETE FROM carts WHERE id = ?1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn insert_product(db: &Database, id: &str, price_cents: i64) {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Product {id}"),
                price_cents,
                promo_price_cents: None,
                promo_starts_on: None,
                promo_ends_on: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upsert_replaces_quantity() {
        let db = test_db().await;
        insert_product(&db, "p1", 100).await;

        let cart = db.carts().get_or_create_for_session("sess-1").await.unwrap();

        let first = db.carts().upsert_line(&cart.id, "p1", 2).await.unwrap();
        assert_eq!(first.quantity, 2);

        // Same product again: quantity replaced, still one line
        let second = db.carts().upsert_line(&cart.id, "p1", 5).await.unwrap();
        assert_eq!(second.quantity, 5);
        assert_eq!(second.id, first.id);
        assert_eq!(db.carts().line_count(&cart.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_line_is_idempotent() {
        let db = test_db().await;
        insert_product(&db, "p1", 100).await;

        let cart = db.carts().get_or_create_for_session("sess-1").await.unwrap();
        db.carts().upsert_line(&cart.id, "p1", 1).await.unwrap();

        assert!(db.carts().delete_line(&cart.id, "p1").await.unwrap());
        // Second removal still succeeds, nothing to delete
        assert!(!db.carts().delete_line(&cart.id, "p1").await.unwrap());
        // Product never in the cart also succeeds
        assert!(!db.carts().delete_line(&cart.id, "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_cart() {
        let db = test_db().await;

        let a = db.carts().get_or_create_for_session("sess-1").await.unwrap();
        let b = db.carts().get_or_create_for_session("sess-1").await.unwrap();
        assert_eq!(a.id, b.id);

        let other = db.carts().get_or_create_for_session("sess-2").await.unwrap();
        assert_ne!(a.id, other.id);
    }

    #[tokio::test]
    async fn test_lines_with_products_join() {
        let db = test_db().await;
        insert_product(&db, "p1", 100).await;
        insert_product(&db, "p2", 200).await;

        let cart = db.carts().get_or_create_for_session("sess-1").await.unwrap();
        db.carts().upsert_line(&cart.id, "p1", 2).await.unwrap();
        db.carts().upsert_line(&cart.id, "p2", 1).await.unwrap();

        let pairs = db.carts().lines_with_products(&cart.id).await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.product_id, pairs[0].1.id);
        assert_eq!(pairs[0].1.price_cents, 100);
    }
}
