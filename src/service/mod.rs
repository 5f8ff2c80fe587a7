//! Account service.
//!
//! # Responsibilities
//! - Create, read, update and delete accounts through `AccountStore`
//! - Enrich single-account reads with customer data
//! - Degrade to an account-only view when the customer service fails
//!
//! # Design Decisions
//! - Collaborators are passed in at construction, never looked up
//! - `NotFound` always propagates; only the customer failure is absorbed

pub mod accounts;
pub mod types;

pub use accounts::AccountService;
pub use types::{AccountError, AccountResult};
