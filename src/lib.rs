//! Bank account microservice library.
//!
//! ```text
//!   HTTP client ──▶ http (axum) ──▶ service::AccountService ──▶ store::AccountStore
//!                                          │
//!                                          ▼
//!                              resilience::CircuitBreaker
//!                                          │ call-or-fallback
//!                                          ▼
//!                              customer::CustomerLookup ──▶ customer service
//! ```

pub mod config;
pub mod customer;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::{AccountError, AccountService};
