//! # Pricing Module
//!
//! Pure cart pricing: lines are priced at the product's effective price for
//! the day, summed into a total, and optionally reduced by a coupon.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Pricing Pipeline                             │
//! │                                                                         │
//! │  (CartLine, Product) pairs            today (calendar date)            │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  ┌──────────────────────────────────────────────────┐                  │
//! │  │  price_cart()                                    │                  │
//! │  │                                                  │                  │
//! │  │  per line: effective_price(today) × quantity     │                  │
//! │  │  (promo price inside the window, base outside)   │                  │
//! │  └──────────────────────┬───────────────────────────┘                  │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  ┌──────────────────────────────────────────────────┐                  │
//! │  │  PricedCart::totals()                            │                  │
//! │  │                                                  │                  │
//! │  │  total          = Σ line totals                  │                  │
//! │  │  with_coupon    = total reduced by bps,          │                  │
//! │  │                   clamped at zero                │                  │
//! │  │  has_items      = at least one line              │                  │
//! │  └──────────────────────────────────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are **recomputed on every read**, never cached: a cart priced
//! today can price differently tomorrow when a promotion window opens or
//! closes.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CartLine, Coupon, Product};
use chrono::NaiveDate;

// =============================================================================
// Priced View Types
// =============================================================================

/// A cart line priced for a specific day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,

    /// Unit price in effect on the pricing day (promo applied if active).
    pub unit_price_cents: i64,

    /// Whether the promo price was in effect when this line was priced.
    pub on_promotion: bool,

    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl PricedLine {
    /// Prices a single line at the product's effective price for `today`.
    pub fn price(line: &CartLine, product: &Product, today: NaiveDate) -> Self {
        let unit_price = product.effective_price(today);
        PricedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: line.quantity,
            unit_price_cents: unit_price.cents(),
            on_promotion: product.on_promotion(today),
            line_total_cents: unit_price.multiply_quantity(line.quantity).cents(),
        }
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A fully priced cart: every line priced for the same day, plus the coupon
/// attached to the cart (if it is still usable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedCart {
    pub cart_id: String,
    pub lines: Vec<PricedLine>,

    /// Reduction from the attached coupon, in basis points. Zero when no
    /// coupon is attached or the attached coupon is no longer usable.
    pub reduction_bps: u32,

    /// Code of the applied coupon, for display.
    pub coupon_code: Option<String>,
}

/// Cart totals, all amounts in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line totals before any coupon.
    pub total_cents: i64,

    /// Amount the coupon removes (zero without a coupon).
    pub reduction_cents: i64,

    /// `total - reduction`, clamped so it is never negative.
    pub total_with_coupon_cents: i64,

    /// True when the cart contains at least one line.
    pub has_items: bool,
}

// =============================================================================
// Pricing Functions
// =============================================================================

/// Prices a cart's lines for `today` and folds in the attached coupon.
///
/// A coupon that has been disabled since it was attached contributes no
/// reduction (see [`Coupon::is_usable`]); it is up to the service layer to
/// decide whether to detach it.
pub fn price_cart(
    cart_id: &str,
    lines: &[(CartLine, Product)],
    coupon: Option<&Coupon>,
    today: NaiveDate,
) -> PricedCart {
    let priced = lines
        .iter()
        .map(|(line, product)| PricedLine::price(line, product, today))
        .collect();

    let usable = coupon.filter(|c| c.is_usable());

    PricedCart {
        cart_id: cart_id.to_string(),
        lines: priced,
        reduction_bps: usable.map(|c| c.reduction_bps).unwrap_or(0),
        coupon_code: usable.map(|c| c.code.clone()),
    }
}

impl PricedCart {
    /// Computes the cart totals.
    ///
    /// An empty cart totals to zero across the board, with `has_items`
    /// false. The reduced total is clamped at zero so an oversized coupon
    /// can never produce a negative amount due.
    pub fn totals(&self) -> CartTotals {
        let total: Money = self
            .lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total());

        let reduction = total.reduction_amount(self.reduction_bps);
        let with_coupon = total.apply_reduction(self.reduction_bps);

        CartTotals {
            total_cents: total.cents(),
            reduction_cents: reduction.cents(),
            total_with_coupon_cents: with_coupon.cents(),
            has_items: !self.lines.is_empty(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price_cents,
            promo_price_cents: None,
            promo_starts_on: None,
            promo_ends_on: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn promo_product(id: &str, price_cents: i64, promo_cents: i64) -> Product {
        Product {
            promo_price_cents: Some(promo_cents),
            promo_starts_on: Some(day("2026-01-01")),
            promo_ends_on: Some(day("2026-12-31")),
            ..product(id, price_cents)
        }
    }

    fn line(cart_id: &str, product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            id: format!("l-{product_id}"),
            cart_id: cart_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            created_at: Utc::now(),
        }
    }

    fn coupon(code: &str, reduction_bps: u32, enabled: bool) -> Coupon {
        Coupon {
            id: format!("c-{code}"),
            label: code.to_string(),
            code: code.to_string(),
            reduction_bps,
            enabled,
            expires_on: day("2030-01-01"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let priced = price_cart("cart-1", &[], None, day("2026-06-15"));
        let totals = priced.totals();

        assert_eq!(totals.total_cents, 0);
        assert_eq!(totals.reduction_cents, 0);
        assert_eq!(totals.total_with_coupon_cents, 0);
        assert!(!totals.has_items);
    }

    #[test]
    fn test_cart_with_promo_and_coupon() {
        // 2 × 100 (base) + 1 × 150 (promo, base 200) = 350, 10% off = 315
        let today = day("2026-06-15");
        let lines = vec![
            (line("cart-1", "p1", 2), product("p1", 100)),
            (line("cart-1", "p2", 1), promo_product("p2", 200, 150)),
        ];
        let c = coupon("TEN", 1000, true);

        let priced = price_cart("cart-1", &lines, Some(&c), today);
        let totals = priced.totals();

        assert_eq!(totals.total_cents, 350);
        assert_eq!(totals.reduction_cents, 35);
        assert_eq!(totals.total_with_coupon_cents, 315);
        assert!(totals.has_items);
        assert_eq!(priced.coupon_code.as_deref(), Some("TEN"));

        // Promo flag surfaces on the priced line
        assert!(!priced.lines[0].on_promotion);
        assert!(priced.lines[1].on_promotion);
    }

    #[test]
    fn test_promo_window_closed_uses_base_price() {
        // Same cart priced after the window closes: 2×100 + 1×200 = 400
        let after = day("2027-02-01");
        let lines = vec![
            (line("cart-1", "p1", 2), product("p1", 100)),
            (line("cart-1", "p2", 1), promo_product("p2", 200, 150)),
        ];

        let priced = price_cart("cart-1", &lines, None, after);
        assert_eq!(priced.totals().total_cents, 400);
    }

    #[test]
    fn test_disabled_coupon_contributes_nothing() {
        let today = day("2026-06-15");
        let lines = vec![(line("cart-1", "p1", 2), product("p1", 500))];
        let c = coupon("OLD", 1000, false);

        let priced = price_cart("cart-1", &lines, Some(&c), today);
        let totals = priced.totals();

        assert_eq!(totals.total_cents, 1000);
        assert_eq!(totals.reduction_cents, 0);
        assert_eq!(totals.total_with_coupon_cents, 1000);
        assert!(priced.coupon_code.is_none());
    }

    #[test]
    fn test_total_with_coupon_never_negative() {
        let today = day("2026-06-15");
        let lines = vec![(line("cart-1", "p1", 1), product("p1", 100))];
        let c = coupon("ALL", 10000, true);

        let totals = price_cart("cart-1", &lines, Some(&c), today).totals();
        assert_eq!(totals.total_with_coupon_cents, 0);
    }

    #[test]
    fn test_has_items_truth_table() {
        let today = day("2026-06-15");

        let empty = price_cart("cart-1", &[], None, today);
        assert!(!empty.totals().has_items);

        let one = price_cart(
            "cart-1",
            &[(line("cart-1", "p1", 1), product("p1", 100))],
            None,
            today,
        );
        assert!(one.totals().has_items);
    }
}
