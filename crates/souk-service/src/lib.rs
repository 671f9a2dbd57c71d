//! # souk-service: Operation Layer for Souk
//!
//! Orchestrates the pure logic in souk-core and the repositories in souk-db
//! into the operations callers invoke.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Souk Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              ★ souk-service (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐  ┌─────────────────┐  ┌─────────────────┐  │   │
//! │  │   │ CartService  │  │ CheckoutService │  │ AccountService  │  │   │
//! │  │   │ add/remove   │  │ cart → order    │  │ request/redeem  │  │   │
//! │  │   │ coupon/view  │  │ (transactional) │  │ reset tokens    │  │   │
//! │  │   └──────────────┘  └─────────────────┘  └─────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Collaborators: Mailer (email), argon2 (password hashing)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │          │                                       │                      │
//! │          ▼                                       ▼                      │
//! │     souk-core (pricing, types)          souk-db (repositories)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart operations: add/remove items, coupons, priced views
//! - [`checkout`] - Converts a cart into an order atomically
//! - [`account`] - Password reset token lifecycle
//! - [`mailer`] - Email dispatch abstraction
//! - [`password`] - Argon2 hashing helpers
//! - [`config`] - Environment-based configuration
//! - [`error`] - The service error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod mailer;
pub mod password;

// =============================================================================
// Re-exports
// =============================================================================

pub use account::AccountService;
pub use cart::{CartService, CartView};
pub use checkout::CheckoutService;
pub use config::{ConfigError, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use mailer::{LogMailer, Mailer, MailerError};
