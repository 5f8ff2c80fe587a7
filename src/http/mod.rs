//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, limits)
//!     → middleware.rs (per-route metrics)
//!     → handlers.rs (decode JSON, call AccountService)
//!     → response.rs (AccountError → status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
