//! # Domain Types
//!
//! Core domain types used throughout Souk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │     Coupon      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  owner          │   │  code           │       │
//! │  │  promo window   │   │  coupon_id      │   │  reduction_bps  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │PasswordReset-   │   │     Order       │       │
//! │  │  ─────────────  │   │Token            │   │  ─────────────  │       │
//! │  │  email          │   │  ─────────────  │   │  transaction_id │       │
//! │  │  password_hash  │   │  token, created │   │  total_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key where one exists (coupon code, user email, transaction id)

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::RESET_TOKEN_TTL_SECS;

// =============================================================================
// Product
// =============================================================================

/// A product listed by a vendor.
///
/// Promotional pricing is driven by an inclusive calendar-date window: the
/// promo price substitutes the base price only while `promo_starts_on <=
/// today <= promo_ends_on`. A product with either bound missing is never on
/// promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to customers.
    pub name: String,

    /// Base price in minor units (non-negative).
    pub price_cents: i64,

    /// Promotional price in minor units, if one is configured.
    pub promo_price_cents: Option<i64>,

    /// First day of the promotion window (inclusive).
    pub promo_starts_on: Option<NaiveDate>,

    /// Last day of the promotion window (inclusive).
    pub promo_ends_on: Option<NaiveDate>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the promotion window covers `today`.
    ///
    /// ## Truth Table
    /// - No start date -> false
    /// - No end date -> false
    /// - Start date in the future -> false
    /// - End date in the past -> false
    /// - Both set and `start <= today <= end` (inclusive) -> true
    ///
    /// This is date-dependent and drifts with the clock, which is why cart
    /// totals are recomputed on every read rather than cached.
    pub fn on_promotion(&self, today: NaiveDate) -> bool {
        match (self.promo_starts_on, self.promo_ends_on) {
            (Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }

    /// The unit price in effect on `today`: the promotional price while on
    /// promotion (and a promo price is configured), the base price otherwise.
    pub fn effective_price(&self, today: NaiveDate) -> Money {
        match self.promo_price_cents {
            Some(promo) if self.on_promotion(today) => Money::from_cents(promo),
            _ => self.price(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's (or anonymous session's) shopping cart.
///
/// Exactly one of `customer_id` / `session_key` identifies the owner. The
/// cart row is deleted on successful checkout, once converted into an
/// [`Order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: String,

    /// Owning customer, for signed-in customers.
    pub customer_id: Option<String>,

    /// Owning session key, for anonymous visitors.
    pub session_key: Option<String>,

    /// Currently attached coupon, if any.
    pub coupon_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A line item in a cart: one product and a positive quantity.
///
/// Lines are unique per (cart, product) - adding a product that is already in
/// the cart replaces the quantity instead of duplicating the line. The
/// storage layer enforces this with a UNIQUE constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: String,
    pub cart_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Coupon
// =============================================================================

/// A promotional code granting a proportional reduction on a cart total.
///
/// The reduction is stored in basis points: 1000 bps = 10%.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: String,

    /// Human-readable label ("Summer sale").
    pub label: String,

    /// The code customers type in. Matched exactly, case-sensitively.
    pub code: String,

    /// Reduction in basis points (1000 = 10% off the cart total).
    pub reduction_bps: u32,

    /// Whether the coupon is currently accepted.
    pub enabled: bool,

    /// Advertised expiry date. Stored for display, but acceptance is gated
    /// on `enabled` alone - see `is_usable`.
    pub expires_on: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon is accepted for use.
    ///
    /// Only the `enabled` flag gates acceptance; `expires_on` is stored but
    /// deliberately not checked here. Disabling a coupon is the operational
    /// way to retire it.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.enabled
    }

    /// The reduction as a fraction (0.0 - 1.0), for display.
    #[inline]
    pub fn reduction_fraction(&self) -> f64 {
        self.reduction_bps as f64 / 10_000.0
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account in the user/password store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,

    /// Argon2 PHC hash string. Never the plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Password Reset Token
// =============================================================================

/// A single-use, time-limited credential for resetting a password.
///
/// ## Lifecycle
/// ```text
/// Issued ──► Valid (within 1 hour) ──► Redeemed (deleted)
///                    │
///                    └──────────────► Expired (deleted lazily on
///                                     redemption, or by cleanup job)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PasswordResetToken {
    pub id: String,
    pub user_id: String,

    /// Opaque random token string carried in the reset link.
    pub token: String,

    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// When the token stops being redeemable.
    #[inline]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(RESET_TOKEN_TTL_SECS)
    }

    /// Whether the token is still within its validity window at `now`.
    #[inline]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at()
    }
}

// =============================================================================
// Order
// =============================================================================

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment confirmation from the gateway.
    Pending,
    /// Payment confirmed.
    Paid,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A placed order, created from a cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub customer_id: String,

    /// Payment gateway transaction id (opaque to this core).
    pub transaction_id: String,

    pub status: OrderStatus,

    /// The cart's total-with-coupon at checkout time.
    pub total_cents: i64,

    pub created_at: DateTime<Utc>,
}

/// A line item in an order.
/// Uses snapshot pattern to freeze product data at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,

    /// Product name at checkout time (frozen).
    pub name_snapshot: String,

    /// Effective unit price at checkout time (frozen, promo applied).
    pub unit_price_cents: i64,

    pub quantity: i64,

    /// unit_price × quantity.
    pub line_total_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(promo_starts_on: Option<NaiveDate>, promo_ends_on: Option<NaiveDate>) -> Product {
        Product {
            id: "p1".to_string(),
            name: "P1".to_string(),
            price_cents: 200,
            promo_price_cents: Some(150),
            promo_starts_on,
            promo_ends_on,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_on_promotion_requires_both_dates() {
        let today = day("2026-06-15");

        assert!(!product(None, None).on_promotion(today));
        assert!(!product(Some(day("2026-06-01")), None).on_promotion(today));
        assert!(!product(None, Some(day("2026-06-30"))).on_promotion(today));
    }

    #[test]
    fn test_on_promotion_window_bounds() {
        let p = product(Some(day("2026-06-10")), Some(day("2026-06-20")));

        // Inclusive on both ends
        assert!(p.on_promotion(day("2026-06-10")));
        assert!(p.on_promotion(day("2026-06-15")));
        assert!(p.on_promotion(day("2026-06-20")));

        // Outside
        assert!(!p.on_promotion(day("2026-06-09")));
        assert!(!p.on_promotion(day("2026-06-21")));
    }

    #[test]
    fn test_effective_price() {
        let today = day("2026-06-15");

        // Active window substitutes the promo price
        let active = product(Some(day("2026-06-01")), Some(day("2026-06-30")));
        assert_eq!(active.effective_price(today).cents(), 150);

        // No window falls back to the base price
        let inactive = product(None, None);
        assert_eq!(inactive.effective_price(today).cents(), 200);

        // Window but no promo price falls back to the base price
        let mut no_promo_price = product(Some(day("2026-06-01")), Some(day("2026-06-30")));
        no_promo_price.promo_price_cents = None;
        assert_eq!(no_promo_price.effective_price(today).cents(), 200);
    }

    #[test]
    fn test_coupon_usable_ignores_expiry() {
        let mut coupon = Coupon {
            id: "c1".to_string(),
            label: "Test".to_string(),
            code: "TEST10".to_string(),
            reduction_bps: 1000,
            enabled: true,
            // Long past - still usable while enabled
            expires_on: day("2020-01-01"),
            created_at: Utc::now(),
        };
        assert!(coupon.is_usable());

        coupon.enabled = false;
        assert!(!coupon.is_usable());
    }

    #[test]
    fn test_reduction_fraction() {
        let coupon = Coupon {
            id: "c1".to_string(),
            label: "Test".to_string(),
            code: "TEST20".to_string(),
            reduction_bps: 2000,
            enabled: true,
            expires_on: day("2030-01-01"),
            created_at: Utc::now(),
        };
        assert!((coupon.reduction_fraction() - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn test_token_validity_window() {
        let issued = Utc::now();
        let token = PasswordResetToken {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            token: "opaque".to_string(),
            created_at: issued,
        };

        assert!(token.is_valid(issued));
        assert!(token.is_valid(issued + Duration::minutes(59)));
        assert!(!token.is_valid(issued + Duration::hours(2)));
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
