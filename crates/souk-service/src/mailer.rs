//! # Mailer
//!
//! Email dispatch abstraction for the password reset flow.
//!
//! The service layer only needs one capability: deliver a reset link to an
//! address. The trait keeps delivery swappable (SMTP relay, API provider,
//! a recorder in tests) without the reset logic knowing which is in use.

use thiserror::Error;
use tracing::info;

/// Email delivery errors.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The delivery backend refused or failed the send.
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Sends password reset emails.
///
/// Implementations must be cheap to call concurrently; the account service
/// holds one instance for its lifetime.
pub trait Mailer: Send + Sync {
    /// Delivers a reset email carrying `link` to `to`.
    fn send_reset_email(
        &self,
        to: &str,
        link: &str,
    ) -> impl std::future::Future<Output = Result<(), MailerError>> + Send;
}

/// Mailer that logs instead of sending.
///
/// Used in development and as the default wiring until a real delivery
/// backend is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_reset_email(&self, to: &str, link: &str) -> Result<(), MailerError> {
        info!(to = %to, link = %link, "Password reset email (log only)");
        Ok(())
    }
}
