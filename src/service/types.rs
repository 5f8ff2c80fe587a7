//! Account service error definitions.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No account with the requested identifier.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// The persistence engine failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;
