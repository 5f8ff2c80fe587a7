//! Account service binary.
//!
//! Loads configuration, assembles the store, customer client and circuit
//! breaker, then serves the account API until a stop signal arrives.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use account_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use account_service::customer::HttpCustomerClient;
use account_service::observability::{logging, metrics};
use account_service::resilience::{CircuitBreaker, RetryPolicy};
use account_service::store::InMemoryAccountStore;
use account_service::{AccountService, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "account-service", version, about = "Bank account microservice")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!("account-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        customer_service = %config.customer_service.base_url,
        failure_threshold = config.circuit_breaker.failure_threshold,
        open_duration_ms = config.circuit_breaker.open_duration_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = match &config.store.persistence_path {
        Some(path) => InMemoryAccountStore::load_from_file(path)?,
        None => InMemoryAccountStore::new(None),
    };
    let customers = HttpCustomerClient::new(
        &config.customer_service,
        RetryPolicy::from_config(&config.retries),
    )?;
    let breaker = CircuitBreaker::new(&config.circuit_breaker);
    let accounts = AccountService::new(
        Arc::new(store.clone()),
        Arc::new(customers),
        Arc::new(breaker),
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, accounts);
    server.run(listener, shutdown.subscribe()).await?;

    store.save_to_file()?;
    tracing::info!("Shutdown complete");
    Ok(())
}
