//! # Cart Service
//!
//! Cart operations: open a cart, add/remove items, apply coupons, and read
//! the priced view.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CartService                                    │
//! │                                                                         │
//! │  open_for_customer / open_for_session  ──► one open cart per owner     │
//! │                                                                         │
//! │  add_item(cart, product, qty)  ──► validate qty, product active,       │
//! │                                    UPSERT line (replace quantity)      │
//! │                                                                         │
//! │  remove_item(cart, product)    ──► idempotent delete                   │
//! │                                                                         │
//! │  apply_coupon(cart, code)      ──► exact enabled code or               │
//! │                                    "invalid coupon"                    │
//! │                                                                         │
//! │  view(cart)                    ──► price every line for TODAY,         │
//! │                                    totals + has_items                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored; `view` reprices from current product rows and
//! the current date on every call.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use souk_core::pricing::{price_cart, CartTotals, PricedCart};
use souk_core::validation::{validate_coupon_code, validate_id, validate_quantity};
use souk_core::{Cart, CartLine};
use souk_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// A cart as presented to callers: priced lines plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub cart: PricedCart,
    pub totals: CartTotals,
}

/// Service for cart operations.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    /// Creates a new CartService.
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Returns the customer's open cart, creating one if needed.
    pub async fn open_for_customer(&self, customer_id: &str) -> ServiceResult<Cart> {
        validate_id(customer_id)?;
        Ok(self.db.carts().get_or_create_for_customer(customer_id).await?)
    }

    /// Returns the anonymous session's open cart, creating one if needed.
    pub async fn open_for_session(&self, session_key: &str) -> ServiceResult<Cart> {
        validate_id(session_key)?;
        Ok(self.db.carts().get_or_create_for_session(session_key).await?)
    }

    /// Adds a product to the cart with the given quantity.
    ///
    /// If the product already has a line in this cart, its quantity is
    /// REPLACED with `quantity` (adding 2 then 5 leaves 5, not 7). The cart
    /// never grows a second line for the same product.
    pub async fn add_item(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> ServiceResult<CartLine> {
        validate_id(product_id)?;
        validate_quantity(quantity)?;

        let cart = self.require_cart(cart_id).await?;

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        debug!(cart_id = %cart.id, product_id = %product.id, quantity, "Adding item to cart");

        let line = self.db.carts().upsert_line(&cart.id, &product.id, quantity).await?;
        Ok(line)
    }

    /// Removes a product from the cart.
    ///
    /// Idempotent: removing a product that isn't in the cart succeeds.
    pub async fn remove_item(&self, cart_id: &str, product_id: &str) -> ServiceResult<()> {
        validate_id(product_id)?;
        let cart = self.require_cart(cart_id).await?;

        let removed = self.db.carts().delete_line(&cart.id, product_id).await?;
        debug!(cart_id = %cart.id, product_id = %product_id, removed, "Removed item from cart");

        Ok(())
    }

    /// Applies a coupon to the cart by exact code.
    ///
    /// The code must match an **enabled** coupon exactly (case-sensitive).
    /// Anything else — unknown code, wrong case, disabled coupon — is the
    /// same rejection: "invalid coupon". A subsequent apply replaces the
    /// cart's current coupon.
    pub async fn apply_coupon(&self, cart_id: &str, code: &str) -> ServiceResult<CartView> {
        let code = validate_coupon_code(code)?;
        let cart = self.require_cart(cart_id).await?;

        let coupon = self
            .db
            .coupons()
            .find_enabled_by_code(&code)
            .await?
            .ok_or(ServiceError::InvalidCoupon)?;

        self.db.carts().set_coupon(&cart.id, Some(&coupon.id)).await?;

        info!(cart_id = %cart.id, code = %coupon.code, "Coupon applied");

        self.view(&cart.id).await
    }

    /// Detaches the cart's coupon, if any.
    pub async fn remove_coupon(&self, cart_id: &str) -> ServiceResult<()> {
        let cart = self.require_cart(cart_id).await?;
        self.db.carts().set_coupon(&cart.id, None).await?;
        Ok(())
    }

    /// Returns the priced view of the cart for today.
    pub async fn view(&self, cart_id: &str) -> ServiceResult<CartView> {
        self.view_on(cart_id, Utc::now().date_naive()).await
    }

    /// Returns the priced view of the cart for a specific day.
    ///
    /// The pricing day is explicit so tests (and backdated reporting) can
    /// pin the promotion window evaluation.
    pub async fn view_on(&self, cart_id: &str, today: NaiveDate) -> ServiceResult<CartView> {
        let cart = self.require_cart(cart_id).await?;

        let pairs = self.db.carts().lines_with_products(&cart.id).await?;

        let coupon = match &cart.coupon_id {
            Some(id) => self.db.coupons().get_by_id(id).await?,
            None => None,
        };

        let priced = price_cart(&cart.id, &pairs, coupon.as_ref(), today);
        let totals = priced.totals();

        Ok(CartView {
            cart: priced,
            totals,
        })
    }

    async fn require_cart(&self, cart_id: &str) -> ServiceResult<Cart> {
        validate_id(cart_id)?;
        self.db
            .carts()
            .get_by_id(cart_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
