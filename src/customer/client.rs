//! HTTP client for the customer service.
//!
//! # Responsibilities
//! - Build the lookup URL from the configured base
//! - Enforce a deadline per attempt
//! - Retry transient failures
//! - Decode the customer payload

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::CustomerServiceConfig;
use crate::customer::{CustomerLookup, CustomerLookupError};
use crate::domain::Customer;
use crate::observability::metrics;
use crate::resilience::{with_deadline, DeadlineExceeded, RetryPolicy};

/// reqwest-backed `CustomerLookup`.
#[derive(Debug, Clone)]
pub struct HttpCustomerClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpCustomerClient {
    pub fn new(
        config: &CustomerServiceConfig,
        retry: RetryPolicy,
    ) -> Result<Self, CustomerLookupError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CustomerLookupError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CustomerLookupError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("account-service/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::info!(
            base_url = %base_url,
            timeout_ms = config.timeout_ms,
            max_attempts = retry.max_attempts(),
            "Customer client initialized"
        );

        Ok(Self {
            client,
            base_url,
            timeout: Duration::from_millis(config.timeout_ms),
            retry,
        })
    }

    /// `{base}/customer/{id}`, with the id encoded as a single path segment.
    pub fn customer_url(&self, customer_id: &str) -> Result<Url, CustomerLookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CustomerLookupError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("customer")
            .push(customer_id);
        Ok(url)
    }

    async fn fetch_once(&self, url: Url) -> Result<Customer, CustomerLookupError> {
        with_deadline(self.timeout, self.request(url))
            .await
            .map_err(|DeadlineExceeded(after)| CustomerLookupError::Timeout(after))?
    }

    async fn request(&self, url: Url) -> Result<Customer, CustomerLookupError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CustomerLookupError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CustomerLookupError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CustomerLookup for HttpCustomerClient {
    async fn fetch_customer(&self, customer_id: &str) -> Result<Customer, CustomerLookupError> {
        let url = self.customer_url(customer_id)?;
        tracing::debug!(customer_id = %customer_id, url = %url, "Fetching customer");

        let result = self
            .retry
            .run(
                |_attempt| self.fetch_once(url.clone()),
                CustomerLookupError::is_transient,
            )
            .await;

        match &result {
            Ok(_) => metrics::record_customer_lookup("success"),
            Err(e) => metrics::record_customer_lookup(e.kind()),
        }
        result
    }
}
