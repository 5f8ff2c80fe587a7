//! Mapping of service errors to HTTP responses.
//!
//! # Design Decisions
//! - NotFound is a client-visible 404 carrying the identifier
//! - Store failures are logged in full and reported as an opaque 500
//! - Customer-service outages never reach this layer (absorbed by the service)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::AccountError;

/// JSON error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AccountError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AccountError::Store(e) => {
                tracing::error!(error = %e, "Account store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Account store unavailable".to_string(),
                )
            }
        };
        (status, Json(ErrorBody::new(status, message))).into_response()
    }
}
