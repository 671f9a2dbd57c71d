//! # Checkout Service
//!
//! Converts a cart into an order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       place_order(cart, txn_id)                         │
//! │                                                                         │
//! │  1. Load cart            ── must exist, must belong to a customer      │
//! │  2. Price lines for today ── promo windows evaluated now, frozen here  │
//! │  3. Build Order + OrderLines (name + unit price snapshots)             │
//! │  4. Store order and delete cart in ONE transaction                     │
//! │                                                                         │
//! │  The order total is the cart's total-with-coupon at this moment;       │
//! │  later price or coupon changes never rewrite it.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use souk_core::pricing::price_cart;
use souk_core::{Order, OrderLine, OrderStatus};
use souk_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// Service for converting carts into orders.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Places an order from the cart and deletes the cart.
    ///
    /// `transaction_id` is the payment gateway's reference, recorded opaque.
    ///
    /// ## Errors
    /// * [`ServiceError::NotFound`] - cart doesn't exist
    /// * [`ServiceError::AnonymousCheckout`] - cart has no signed-in customer
    /// * [`ServiceError::EmptyCart`] - cart has no lines
    pub async fn place_order(&self, cart_id: &str, transaction_id: &str) -> ServiceResult<Order> {
        let cart = self
            .db
            .carts()
            .get_by_id(cart_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

        let customer_id = cart
            .customer_id
            .clone()
            .ok_or(ServiceError::AnonymousCheckout)?;

        let pairs = self.db.carts().lines_with_products(&cart.id).await?;
        if pairs.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let coupon = match &cart.coupon_id {
            Some(id) => self.db.coupons().get_by_id(id).await?,
            None => None,
        };

        let now = Utc::now();
        let priced = price_cart(&cart.id, &pairs, coupon.as_ref(), now.date_naive());
        let totals = priced.totals();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id,
            transaction_id: transaction_id.to_string(),
            status: OrderStatus::Pending,
            total_cents: totals.total_with_coupon_cents,
            created_at: now,
        };

        let lines: Vec<OrderLine> = priced
            .lines
            .iter()
            .map(|line| OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                product_id: line.product_id.clone(),
                name_snapshot: line.product_name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total_cents,
                created_at: now,
            })
            .collect();

        self.db
            .orders()
            .create_from_cart(&order, &lines, &cart.id)
            .await?;

        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            total_cents = order.total_cents,
            "Checkout complete"
        );

        Ok(order)
    }

    /// Marks an order as paid (payment gateway confirmation).
    pub async fn confirm_payment(&self, order_id: &str) -> ServiceResult<()> {
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

        self.db.orders().set_status(order_id, OrderStatus::Paid).await?;
        info!(order_id = %order_id, "Payment confirmed");

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartService;
    use chrono::Duration;
    use souk_core::{Coupon, Product, User};
    use souk_db::DbConfig;

    struct Fixture {
        db: Database,
        carts: CartService,
        checkout: CheckoutService,
        customer_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();

        Fixture {
            carts: CartService::new(db.clone()),
            checkout: CheckoutService::new(db.clone()),
            customer_id: user.id,
            db,
        }
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
    async fn test_place_order_snapshots_and_deletes_cart() {
        let f = fixture().await;
        insert_product(&f.db, "p1", 100).await;
        insert_product(&f.db, "p2", 250).await;

        let cart = f.carts.open_for_customer(&f.customer_id).await.unwrap();
        f.carts.add_item(&cart.id, "p1", 2).await.unwrap();
        f.carts.add_item(&cart.id, "p2", 1).await.unwrap();

        let order = f.checkout.place_order(&cart.id, "txn-001").await.unwrap();
        assert_eq!(order.total_cents, 450);
        assert_eq!(order.status, OrderStatus::Pending);

        // Cart is gone
        assert!(f.db.carts().get_by_id(&cart.id).await.unwrap().is_none());

        // Lines snapshot name and unit price
        let lines = f.db.orders().lines_for_order(&order.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        let p1 = lines.iter().find(|l| l.product_id == "p1").unwrap();
        assert_eq!(p1.unit_price_cents, 100);
        assert_eq!(p1.quantity, 2);
        assert_eq!(p1.line_total_cents, 200);
        assert_eq!(p1.name_snapshot, "Product p1");
    }

    #[tokio::test]
    async fn test_order_total_includes_coupon() {
        let f = fixture().await;
        insert_product(&f.db, "p1", 1000).await;
        f.db.coupons()
            .insert(&Coupon {
                id: Uuid::new_v4().to_string(),
                label: "10% off".to_string(),
                code: "TEN".to_string(),
                reduction_bps: 1000,
                enabled: true,
                expires_on: (Utc::now() + Duration::days(30)).date_naive(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let cart = f.carts.open_for_customer(&f.customer_id).await.unwrap();
        f.carts.add_item(&cart.id, "p1", 1).await.unwrap();
        f.carts.apply_coupon(&cart.id, "TEN").await.unwrap();

        let order = f.checkout.place_order(&cart.id, "txn-002").await.unwrap();
        assert_eq!(order.total_cents, 900);
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_and_anonymous_carts() {
        let f = fixture().await;
        insert_product(&f.db, "p1", 100).await;

        let empty = f.carts.open_for_customer(&f.customer_id).await.unwrap();
        assert!(matches!(
            f.checkout.place_order(&empty.id, "txn-1").await,
            Err(ServiceError::EmptyCart)
        ));

        let anon = f.carts.open_for_session("sess-1").await.unwrap();
        f.carts.add_item(&anon.id, "p1", 1).await.unwrap();
        assert!(matches!(
            f.checkout.place_order(&anon.id, "txn-2").await,
            Err(ServiceError::AnonymousCheckout)
        ));
        // Rejected checkout leaves the cart intact
        assert!(f.db.carts().get_by_id(&anon.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_confirm_payment() {
        let f = fixture().await;
        insert_product(&f.db, "p1", 100).await;

        let cart = f.carts.open_for_customer(&f.customer_id).await.unwrap();
        f.carts.add_item(&cart.id, "p1", 1).await.unwrap();
        let order = f.checkout.place_order(&cart.id, "txn-003").await.unwrap();

        f.checkout.confirm_payment(&order.id).await.unwrap();
        let stored = f.db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }
}
