//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build store, client, breaker → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → Stop accepting → Drain → Save snapshot → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
