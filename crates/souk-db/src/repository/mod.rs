//! # Repository Module
//!
//! Database repository implementations for Souk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.carts().upsert_line(cart_id, product_id, qty)              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── upsert_line(&self, cart_id, product_id, qty)                      │
//! │  ├── delete_line(&self, cart_id, product_id)                           │
//! │  └── lines_with_products(&self, cart_id)                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database)                                   │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`cart::CartRepository`] - Cart and line operations (upsert semantics)
//! - [`coupon::CouponRepository`] - Coupon lookup by exact code
//! - [`user::UserRepository`] - User lookup and password updates
//! - [`token::ResetTokenRepository`] - Password reset token lifecycle
//! - [`order::OrderRepository`] - Checkout conversion (cart → order)

pub mod cart;
pub mod coupon;
pub mod order;
pub mod product;
pub mod token;
pub mod user;
