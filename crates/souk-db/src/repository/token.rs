//! # Password Reset Token Repository
//!
//! Database operations for the reset token lifecycle.
//!
//! ## Lifecycle at the Storage Level
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Token Rows Over Time                                  │
//! │                                                                         │
//! │  request_reset  ──► INSERT (id, user_id, token, created_at)            │
//! │                                                                         │
//! │  redeem (valid) ──► DELETE by id           (single use)                │
//! │  redeem (stale) ──► DELETE by id           (lazy expiry)               │
//! │                                                                         │
//! │  cleanup job    ──► DELETE WHERE created_at < cutoff                   │
//! │                     (sweeps tokens never redeemed)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expiry POLICY (the 1-hour window) lives in souk-core and souk-service;
//! this repository only deletes what it is told to delete.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use souk_core::PasswordResetToken;

/// Repository for password reset token operations.
#[derive(Debug, Clone)]
pub struct ResetTokenRepository {
    pool: SqlitePool,
}

impl ResetTokenRepository {
    /// Creates a new ResetTokenRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ResetTokenRepository { pool }
    }

    /// Issues a new token for a user.
    ///
    /// A user may hold several live tokens at once (each request issues a
    /// fresh one); redeeming any one of them does not touch the others.
    pub async fn issue(&self, user_id: &str, token: &str) -> DbResult<PasswordResetToken> {
        let record = PasswordResetToken {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token: token.to_string(),
            created_at: Utc::now(),
        };

        debug!(user_id = %user_id, token_id = %record.id, "Issuing reset token");

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, user_id, token, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.token)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Finds a token by its opaque string value.
    pub async fn find_by_token(&self, token: &str) -> DbResult<Option<PasswordResetToken>> {
        let record = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, user_id, token, created_at
            FROM password_reset_tokens
            WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes a token by ID (on redemption or lazy expiry).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(token_id = %id, "Deleting reset token");

        sqlx::query("DELETE FROM password_reset_tokens WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes all tokens created before `cutoff`.
    ///
    /// Run by the scheduled cleanup job. Returns how many were swept.
    pub async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE created_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        let swept = result.rows_affected();
        debug!(swept, "Swept expired reset tokens");

        Ok(swept)
    }

    /// Counts live token rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_tokens")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use souk_core::User;

    async fn test_db_with_user() -> (Database, String) {
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
        (db, user.id)
    }

    #[tokio::test]
    async fn test_issue_and_find() {
        let (db, user_id) = test_db_with_user().await;

        let issued = db.reset_tokens().issue(&user_id, "opaque-1").await.unwrap();

        let found = db
            .reset_tokens()
            .find_by_token("opaque-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, issued.id);
        assert_eq!(found.user_id, user_id);

        assert!(db
            .reset_tokens()
            .find_by_token("unknown")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_created_before_sweeps_only_stale() {
        let (db, user_id) = test_db_with_user().await;

        db.reset_tokens().issue(&user_id, "fresh").await.unwrap();
        db.reset_tokens().issue(&user_id, "fresh-2").await.unwrap();

        // Cutoff in the past sweeps nothing
        let cutoff = Utc::now() - Duration::hours(1);
        assert_eq!(
            db.reset_tokens().delete_created_before(cutoff).await.unwrap(),
            0
        );
        assert_eq!(db.reset_tokens().count().await.unwrap(), 2);

        // Cutoff in the future sweeps everything
        let cutoff = Utc::now() + Duration::hours(1);
        assert_eq!(
            db.reset_tokens().delete_created_before(cutoff).await.unwrap(),
            2
        );
        assert_eq!(db.reset_tokens().count().await.unwrap(), 0);
    }
}
