//! # Account Service
//!
//! The password reset token lifecycle.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Password Reset Flow                                 │
//! │                                                                         │
//! │  request_reset(email)                                                  │
//! │       │                                                                 │
//! │       ├── bad syntax        → "invalid email address"                  │
//! │       ├── unknown address   → "no account found for this email"        │
//! │       └── known address     → issue token, PERSIST, then email link    │
//! │                               (mail failure keeps the token — the      │
//! │                                link may still arrive on retry paths)   │
//! │                                                                         │
//! │  redeem(token, password, confirm)                                      │
//! │       │                                                                 │
//! │       ├── unknown token     → "invalid link"                           │
//! │       ├── older than 1 hour → delete token, "the reset link has        │
//! │       │                        expired"           (lazy expiry)        │
//! │       ├── password mismatch → error, token NOT consumed                │
//! │       └── ok                → hash (argon2), store, delete token       │
//! │                                                                         │
//! │  cleanup_expired()          → sweep tokens past the window             │
//! │                               (scheduled; see cleanup-tokens binary)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use souk_core::error::ValidationError;
use souk_core::validation::validate_email;
use souk_db::Database;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::mailer::Mailer;
use crate::password;

/// Service for the password reset lifecycle.
#[derive(Debug, Clone)]
pub struct AccountService<M: Mailer> {
    db: Database,
    mailer: M,
    config: ServiceConfig,
}

impl<M: Mailer> AccountService<M> {
    /// Creates a new AccountService.
    pub fn new(db: Database, mailer: M, config: ServiceConfig) -> Self {
        AccountService { db, mailer, config }
    }

    /// Requests a password reset for the given email address.
    ///
    /// The token is persisted BEFORE the email is sent, and is NOT rolled
    /// back if delivery fails: the failure is surfaced, but a retried send
    /// (or an operator resending the link) can still use the issued token.
    pub async fn request_reset(&self, email: &str) -> ServiceResult<()> {
        let email = validate_email(email).map_err(|_| ServiceError::InvalidEmail)?;

        let user = self
            .db
            .users()
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let token_value = Uuid::new_v4().simple().to_string();
        let token = self.db.reset_tokens().issue(&user.id, &token_value).await?;

        info!(user_id = %user.id, token_id = %token.id, "Reset token issued");

        let link = self.config.reset_link(&token.token);
        if let Err(e) = self.mailer.send_reset_email(&user.email, &link).await {
            warn!(user_id = %user.id, error = %e, "Reset email delivery failed, token kept");
            return Err(ServiceError::Internal(e.to_string()));
        }

        info!(user_id = %user.id, "Reset email sent");
        Ok(())
    }

    /// Redeems a reset token, replacing the user's password.
    ///
    /// Single use: success deletes the token. Expiry is enforced lazily
    /// here — a stale token is deleted the moment someone tries it. A
    /// password mismatch does NOT consume the token, so the user can retry
    /// from the same link.
    pub async fn redeem(
        &self,
        token_value: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ServiceResult<()> {
        let token = self
            .db
            .reset_tokens()
            .find_by_token(token_value)
            .await?
            .ok_or(ServiceError::TokenNotFound)?;

        let now = Utc::now();
        let expires_at = token.created_at + Duration::seconds(self.config.reset_token_ttl_secs);
        if now > expires_at {
            self.db.reset_tokens().delete(&token.id).await?;
            info!(token_id = %token.id, "Expired reset token deleted on redemption attempt");
            return Err(ServiceError::TokenExpired);
        }

        if new_password != confirm_password {
            return Err(ServiceError::PasswordMismatch);
        }

        if new_password.is_empty() {
            return Err(ServiceError::Validation(ValidationError::Required {
                field: "password".to_string(),
            }));
        }

        let hash = password::hash_password(new_password)?;
        self.db
            .users()
            .update_password_hash(&token.user_id, &hash)
            .await?;

        self.db.reset_tokens().delete(&token.id).await?;

        info!(user_id = %token.user_id, "Password reset complete, token consumed");
        Ok(())
    }

    /// Sweeps all tokens past the validity window. Returns how many were
    /// deleted. Run on a schedule (see the `cleanup-tokens` binary).
    pub async fn cleanup_expired(&self) -> ServiceResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(self.config.reset_token_ttl_secs);
        let swept = self.db.reset_tokens().delete_created_before(cutoff).await?;

        if swept > 0 {
            info!(swept, "Swept expired reset tokens");
        }

        Ok(swept)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailerError;
    use souk_core::User;
    use souk_db::DbConfig;
    use std::sync::{Arc, Mutex};

    /// Records every send instead of delivering.
    #[derive(Debug, Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Mailer for RecordingMailer {
        async fn send_reset_email(&self, to: &str, link: &str) -> Result<(), MailerError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), link.to_string()));
            Ok(())
        }
    }

    /// Fails every send.
    #[derive(Debug, Clone, Default)]
    struct FailingMailer;

    impl Mailer for FailingMailer {
        async fn send_reset_email(&self, _to: &str, _link: &str) -> Result<(), MailerError> {
            Err(MailerError::Delivery("smtp connection refused".to_string()))
        }
    }

    async fn test_db_with_user() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password_hash: password::hash_password("old-password").unwrap(),
            is_active: true,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
        (db, user.id)
    }

    fn service<M: Mailer>(db: Database, mailer: M) -> AccountService<M> {
        AccountService::new(db, mailer, ServiceConfig::default())
    }

    /// Rewrites a token's created_at so expiry paths can be exercised.
    async fn backdate_token(db: &Database, token_value: &str, secs: i64) {
        let created = Utc::now() - Duration::seconds(secs);
        sqlx::query("UPDATE password_reset_tokens SET created_at = ?2 WHERE token = ?1")
            .bind(token_value)
            .bind(created)
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn issued_token_value(db: &Database, user_id: &str) -> String {
        let (value,): (String,) = sqlx::query_as(
            "SELECT token FROM password_reset_tokens WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
        value
    }

    #[tokio::test]
    async fn test_request_reset_unknown_email() {
        let (db, _) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        let err = svc.request_reset("ghost@example.com").await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound));
        assert_eq!(db.reset_tokens().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_request_reset_invalid_email_syntax() {
        let (db, _) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        let err = svc.request_reset("not-an-email").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidEmail));
        assert_eq!(err.to_string(), "invalid email address");
        assert_eq!(db.reset_tokens().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_request_reset_sends_link_with_token() {
        let (db, user_id) = test_db_with_user().await;
        let mailer = RecordingMailer::default();
        let svc = service(db.clone(), mailer.clone());

        svc.request_reset("amina@example.com").await.unwrap();

        let token = issued_token_value(&db, &user_id).await;
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "amina@example.com");
        assert!(sent[0].1.ends_with(&token));
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_token() {
        let (db, _) = test_db_with_user().await;
        let svc = service(db.clone(), FailingMailer);

        let err = svc.request_reset("amina@example.com").await.unwrap_err();
        match err {
            ServiceError::Internal(msg) => assert!(msg.contains("smtp connection refused")),
            other => panic!("expected Internal, got {other:?}"),
        }

        // No rollback: the token survived the failed send
        assert_eq!(db.reset_tokens().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_redeem_unknown_token() {
        let (db, _) = test_db_with_user().await;
        let svc = service(db, RecordingMailer::default());

        assert!(matches!(
            svc.redeem("never-issued", "new-pass", "new-pass").await,
            Err(ServiceError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_redeem_expired_token_is_deleted() {
        let (db, user_id) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        svc.request_reset("amina@example.com").await.unwrap();
        let token = issued_token_value(&db, &user_id).await;
        backdate_token(&db, &token, 2 * 3600).await;

        assert!(matches!(
            svc.redeem(&token, "new-pass", "new-pass").await,
            Err(ServiceError::TokenExpired)
        ));
        // Lazy deletion: the stale row is gone
        assert_eq!(db.reset_tokens().count().await.unwrap(), 0);

        // And a second attempt now reads as an unknown token
        assert!(matches!(
            svc.redeem(&token, "new-pass", "new-pass").await,
            Err(ServiceError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_redeem_mismatch_keeps_token() {
        let (db, user_id) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        svc.request_reset("amina@example.com").await.unwrap();
        let token = issued_token_value(&db, &user_id).await;

        assert!(matches!(
            svc.redeem(&token, "new-pass", "different").await,
            Err(ServiceError::PasswordMismatch)
        ));

        // Token not consumed: retry from the same link succeeds
        svc.redeem(&token, "new-pass", "new-pass").await.unwrap();
    }

    #[tokio::test]
    async fn test_redeem_success_updates_password_and_consumes_token() {
        let (db, user_id) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        svc.request_reset("amina@example.com").await.unwrap();
        let token = issued_token_value(&db, &user_id).await;

        svc.redeem(&token, "brand-new-pass", "brand-new-pass")
            .await
            .unwrap();

        let user = db.users().get_by_id(&user_id).await.unwrap().unwrap();
        assert!(password::verify_password("brand-new-pass", &user.password_hash));
        assert!(!password::verify_password("old-password", &user.password_hash));

        // Single use
        assert!(matches!(
            svc.redeem(&token, "again", "again").await,
            Err(ServiceError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_cleanup_sweeps_only_stale_tokens() {
        let (db, user_id) = test_db_with_user().await;
        let svc = service(db.clone(), RecordingMailer::default());

        svc.request_reset("amina@example.com").await.unwrap();
        svc.request_reset("amina@example.com").await.unwrap();
        assert_eq!(db.reset_tokens().count().await.unwrap(), 2);

        let stale = issued_token_value(&db, &user_id).await;
        backdate_token(&db, &stale, 2 * 3600).await;

        assert_eq!(svc.cleanup_expired().await.unwrap(), 1);
        assert_eq!(db.reset_tokens().count().await.unwrap(), 1);
    }
}
