//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! Every error is collected so an operator sees the whole list at once.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("customer_service.base_url: {0}")]
    InvalidBaseUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error(
        "worst-case customer lookup ({lookup_ms}ms) does not fit in timeouts.request_secs ({request_ms}ms)"
    )]
    LookupBudget { lookup_ms: u64, request_ms: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.customer_service.base_url) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidBaseUrl(
            "URL cannot be used as a base".to_string(),
        )),
        Ok(url) if !matches!(url.scheme(), "http" | "https") => errors.push(
            ValidationError::InvalidBaseUrl(format!("unsupported scheme '{}'", url.scheme())),
        ),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl(e.to_string())),
    }

    let positive = [
        ("listener.max_body_size", config.listener.max_body_size as u64),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("customer_service.timeout_ms", config.customer_service.timeout_ms),
        ("circuit_breaker.failure_threshold", config.circuit_breaker.failure_threshold as u64),
        ("circuit_breaker.open_duration_ms", config.circuit_breaker.open_duration_ms),
        ("retries.max_attempts", config.retries.max_attempts as u64),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    let lookup_ms = lookup_budget_ms(config);
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    if request_ms > 0 && lookup_ms >= request_ms {
        errors.push(ValidationError::LookupBudget {
            lookup_ms,
            request_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest a customer lookup can take: every attempt hits its deadline and
/// every backoff draws its full jitter.
fn lookup_budget_ms(config: &ServiceConfig) -> u64 {
    let retries = &config.retries;
    let attempts = if retries.enabled {
        u64::from(retries.max_attempts.max(1))
    } else {
        1
    };

    let mut total = attempts.saturating_mul(config.customer_service.timeout_ms);
    for attempt in 1..attempts {
        let exponential = 2u64.saturating_pow((attempt - 1) as u32);
        let capped = retries
            .base_delay_ms
            .saturating_mul(exponential)
            .min(retries.max_delay_ms);
        total = total.saturating_add(capped + capped / 10);
    }
    total
}
