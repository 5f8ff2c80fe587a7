//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Customer lookup:
//!     → circuit_breaker.rs (reject fast while open, otherwise admit)
//!     → retries.rs (retry transient failures with backoff)
//!     → timeouts.rs (deadline on every attempt)
//!     → on failure: fallback closure supplied by the caller
//! ```
//!
//! # Design Decisions
//! - Every outbound call has a deadline
//! - Only idempotent lookups are retried
//! - The breaker counts one outcome per guarded call, after retries

pub mod circuit_breaker;
pub mod retries;
pub mod timeouts;

pub use circuit_breaker::{CallFailure, CircuitBreaker, CircuitState};
pub use retries::RetryPolicy;
pub use timeouts::{with_deadline, DeadlineExceeded};
