//! # Service Error Types
//!
//! The error taxonomy callers of souk-service see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (souk-core) ──┐                                       │
//! │  CoreError (souk-core)       ──┼──► ServiceError ──► Caller            │
//! │  DbError (souk-db)           ──┤                                       │
//! │  MailerError                 ──┘                                       │
//! │                                                                         │
//! │  Variants carry the exact user-facing message; callers can match on    │
//! │  the variant or just display it.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use souk_core::error::{CoreError, ValidationError};
use souk_db::DbError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation (bad email syntax, non-positive quantity...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity doesn't exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The email address is syntactically malformed.
    ///
    /// Distinct from the general `Validation` wrapper so callers can give
    /// address-specific feedback before any user lookup happens.
    #[error("invalid email address")]
    InvalidEmail,

    /// No account exists for the given email address.
    ///
    /// This deliberately distinguishes unknown addresses from known ones;
    /// the deployment accepts the account-enumeration trade-off in exchange
    /// for clearer user feedback.
    #[error("no account found for this email")]
    UserNotFound,

    /// The reset token doesn't exist (never issued, or already consumed).
    #[error("invalid link")]
    TokenNotFound,

    /// The reset token exists but is past its validity window.
    /// The token has been deleted; a new request is needed.
    #[error("the reset link has expired")]
    TokenExpired,

    /// The two password fields don't match. The token is NOT consumed.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The coupon code doesn't match an enabled coupon.
    #[error("invalid coupon")]
    InvalidCoupon,

    /// Checkout attempted on a cart with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Checkout attempted on an anonymous cart.
    #[error("checkout requires a signed-in customer")]
    AnonymousCheckout,

    /// Business rule violation from souk-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Unexpected failure (mail delivery, hashing). Carries the cause text.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            ServiceError::InvalidEmail.to_string(),
            "invalid email address"
        );
        assert_eq!(
            ServiceError::UserNotFound.to_string(),
            "no account found for this email"
        );
        assert_eq!(ServiceError::TokenNotFound.to_string(), "invalid link");
        assert_eq!(
            ServiceError::TokenExpired.to_string(),
            "the reset link has expired"
        );
        assert_eq!(ServiceError::InvalidCoupon.to_string(), "invalid coupon");
    }

    #[test]
    fn test_db_error_passes_through() {
        let err: ServiceError = DbError::PoolExhausted.into();
        assert_eq!(err.to_string(), "Connection pool exhausted");
    }
}
