//! Shared utilities for integration tests.
#![allow(dead_code)]

use account_service::config::{validate_config, ServiceConfig};
use account_service::customer::HttpCustomerClient;
use account_service::resilience::{CircuitBreaker, RetryPolicy};
use account_service::store::InMemoryAccountStore;
use account_service::{AccountService, HttpServer, Shutdown};
use axum::{
    extract::Path,
    http::{header, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Start a programmable customer service. `f` receives the customer id from
/// the path and returns the status and JSON body to answer with.
pub async fn start_customer_service<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    let app = Router::new().route(
        "/customer/{id}",
        get(move |Path(id): Path<String>| {
            let f = f.clone();
            async move {
                let (status, body) = f(id).await;
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// JSON for a customer the mock service knows.
pub fn customer_json(id: &str) -> String {
    json!({ "customerId": id, "name": "Ada Lovelace", "email": "ada@example.com" }).to_string()
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the account service against `customer_addr`. `tweak` adjusts the
/// test defaults (no retries, no metrics, short lookup timeout).
pub async fn start_account_service(
    customer_addr: SocketAddr,
    tweak: impl FnOnce(&mut ServiceConfig),
) -> (SocketAddr, Shutdown) {
    let mut config = ServiceConfig::default();
    config.customer_service.base_url = format!("http://{}", customer_addr);
    config.customer_service.timeout_ms = 500;
    config.retries.enabled = false;
    config.observability.metrics_enabled = false;
    tweak(&mut config);
    validate_config(&config).expect("test config must be valid");

    let customers = HttpCustomerClient::new(
        &config.customer_service,
        RetryPolicy::from_config(&config.retries),
    )
    .unwrap();
    let accounts = AccountService::new(
        Arc::new(InMemoryAccountStore::new(None)),
        Arc::new(customers),
        Arc::new(CircuitBreaker::new(&config.circuit_breaker)),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, accounts);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Create an account and return its JSON.
pub async fn create_account(
    client: &reqwest::Client,
    addr: SocketAddr,
    customer_id: &str,
    account_type: &str,
) -> Value {
    let res = client
        .post(format!("http://{}/accounts", addr))
        .json(&json!({ "customerId": customer_id, "accountType": account_type }))
        .send()
        .await
        .expect("account service unreachable");
    assert_eq!(res.status(), 201);
    res.json().await.unwrap()
}

/// GET an account by id, asserting success.
pub async fn get_account(client: &reqwest::Client, addr: SocketAddr, id: &str) -> Value {
    let res = client
        .get(format!("http://{}/accounts/{}", addr, id))
        .send()
        .await
        .expect("account service unreachable");
    assert_eq!(res.status(), 200);
    res.json().await.unwrap()
}
