//! # Coupon Repository
//!
//! Database operations for coupons.
//!
//! Codes are matched **exactly** (SQLite TEXT comparison is case-sensitive
//! by default, and the `code` column carries no COLLATE NOCASE). "summer10"
//! does not find "SUMMER10".

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use souk_core::Coupon;

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Gets a coupon by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT id, label, code, reduction_bps, enabled, expires_on, created_at
            FROM coupons
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Finds an **enabled** coupon by exact code.
    ///
    /// Disabled coupons are invisible to this lookup: a customer entering a
    /// retired code gets the same answer as one entering a code that never
    /// existed. The expiry date is deliberately not part of the filter.
    pub async fn find_enabled_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        debug!(code = %code, "Looking up coupon by code");

        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT id, label, code, reduction_bps, enabled, expires_on, created_at
            FROM coupons
            WHERE code = ?1 AND enabled = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Inserts a new coupon.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<Coupon> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (id, label, code, reduction_bps, enabled, expires_on, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.label)
        .bind(&coupon.code)
        .bind(coupon.reduction_bps)
        .bind(coupon.enabled)
        .bind(coupon.expires_on)
        .bind(coupon.created_at)
        .execute(&self.pool)
        .await?;

        Ok(coupon.clone())
    }

    /// Enables or disables a coupon.
    ///
    /// Disabling is the operational way to retire a code; existing carts
    /// holding the coupon stop receiving the reduction on their next pricing.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> DbResult<()> {
        debug!(id = %id, enabled, "Toggling coupon");

        sqlx::query("UPDATE coupons SET enabled = ?2 WHERE id = ?1")
            .bind(id)
            .bind(enabled)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
