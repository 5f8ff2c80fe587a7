//! Customer lookup subsystem.
//!
//! # Data Flow
//! ```text
//! AccountService::get
//!     → CircuitBreaker::call_or_fallback
//!     → CustomerLookup::fetch_customer (client.rs: retries + deadline)
//!     → GET {base_url}/customer/{customerId}
//! ```

pub mod client;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Customer;

pub use client::HttpCustomerClient;

/// Errors that can occur while looking up a customer.
#[derive(Debug, Error)]
pub enum CustomerLookupError {
    #[error("invalid customer service URL: {0}")]
    InvalidUrl(String),

    #[error("customer service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("customer service timed out after {0:?}")]
    Timeout(Duration),

    #[error("customer service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid customer payload: {0}")]
    Decode(String),
}

impl CustomerLookupError {
    /// Connection errors, timeouts and 5xx may succeed on another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            CustomerLookupError::Transport(_) | CustomerLookupError::Timeout(_) => true,
            CustomerLookupError::Status(status) => status.is_server_error(),
            CustomerLookupError::InvalidUrl(_) | CustomerLookupError::Decode(_) => false,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CustomerLookupError::InvalidUrl(_) => "invalid_url",
            CustomerLookupError::Transport(_) => "transport",
            CustomerLookupError::Timeout(_) => "timeout",
            CustomerLookupError::Status(_) => "status",
            CustomerLookupError::Decode(_) => "decode",
        }
    }
}

/// Remote lookup of customers by identifier.
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn fetch_customer(&self, customer_id: &str) -> Result<Customer, CustomerLookupError>;
}
