//! Account endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::domain::{Account, AccountUpdate, NewAccount};
use crate::http::server::AppState;
use crate::service::AccountError;

#[derive(Debug, Serialize)]
pub struct BreakerStatus {
    pub name: String,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub circuit_breaker: BreakerStatus,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let breaker = state.accounts.breaker();
    Json(HealthStatus {
        status: "UP",
        version: env!("CARGO_PKG_VERSION"),
        circuit_breaker: BreakerStatus {
            name: breaker.name().to_string(),
            state: breaker.state().as_str(),
        },
    })
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AccountError> {
    let account = state.accounts.create(new_account).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, AccountError> {
    Ok(Json(state.accounts.list_all().await?))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, AccountError> {
    Ok(Json(state.accounts.get(&id).await?))
}

pub async fn get_accounts_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Account>>, AccountError> {
    Ok(Json(state.accounts.get_by_customer_id(&customer_id).await?))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<AccountUpdate>,
) -> Result<Json<Account>, AccountError> {
    Ok(Json(state.accounts.update(&id, update).await?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AccountError> {
    state.accounts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
