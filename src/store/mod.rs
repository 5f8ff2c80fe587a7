//! Account persistence.
//!
//! # Responsibilities
//! - Define the `AccountStore` seam the service depends on
//! - Provide an in-process implementation for standalone runs and tests
//!
//! # Design Decisions
//! - Single-record operations are atomic; nothing spans two records
//! - `customer` is presentation data and is stripped before anything is stored
//! - Production engines plug in behind the same trait

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use chrono::{DateTime, Utc};

use crate::domain::{Account, AccountUpdate};

pub use memory::InMemoryAccountStore;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence keyed by account identifier, also queryable by customer.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert or replace the record with the account's identifier.
    async fn save(&self, account: Account) -> StoreResult<Account>;

    /// Every stored account, in store order.
    async fn find_all(&self) -> StoreResult<Vec<Account>>;

    async fn find_by_id(&self, account_id: &str) -> StoreResult<Option<Account>>;

    async fn find_by_customer_id(&self, customer_id: &str) -> StoreResult<Vec<Account>>;

    /// Apply `update` to the stored record in one step. Returns `None` when
    /// nothing matched, so a record deleted meanwhile stays deleted.
    async fn update(
        &self,
        account_id: &str,
        update: AccountUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Account>>;

    /// Remove a record. Returns false when nothing matched.
    async fn delete(&self, account_id: &str) -> StoreResult<bool>;
}
