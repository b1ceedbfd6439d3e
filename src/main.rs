use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod metrics;
mod storage;
mod utils;

use api::ApiCredentials;
use config::{Config, StorageBackend};
use domain::customer::CustomerService;
use metrics::Metrics;
use storage::{CustomerRepository, InMemoryCustomerRepository, PostgresCustomerRepository};
use utils::{retry_with_backoff, RetryConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, overridable with RUST_LOG
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,customer_api=debug")),
        )
        .init();

    tracing::info!("Starting customer API");

    // === 1. Configuration ===
    let config = Config::load()?;
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        backend = ?config.storage.backend,
        security = ?config.security,
        "Configuration loaded"
    );

    // === 2. Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!(
        "Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 3. Storage ===
    let repository = build_repository(&config, &metrics).await?;

    // === 4. Service and credentials ===
    let service = web::Data::new(CustomerService::new(repository).with_metrics(metrics.clone()));
    let credentials = web::Data::new(ApiCredentials::from_config(&config.security));
    if !config.security.enabled {
        tracing::warn!("HTTP Basic authentication is disabled");
    }

    // === 5. HTTP server ===
    let metrics_data = web::Data::from(metrics);
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(credentials.clone())
            .app_data(metrics_data.clone())
            .wrap(from_fn(metrics::track_requests))
            .configure(metrics::configure_endpoints)
            .configure(api::configure_routes)
    })
    .client_request_timeout(config.server.request_timeout());

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let address = (config.server.host.as_str(), config.server.port);
    tracing::info!("Listening on {}:{}", address.0, address.1);

    server.bind(address)?.run().await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Pick the repository for the configured backend. PostgreSQL is retried
/// with backoff while the database comes up, then its schema is ensured.
async fn build_repository(
    config: &Config,
    metrics: &Metrics,
) -> anyhow::Result<Arc<dyn CustomerRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; customers are lost on restart");
            Ok(Arc::new(InMemoryCustomerRepository::new()))
        }
        StorageBackend::Postgres => {
            let database = &config.database;
            let repository = retry_with_backoff(RetryConfig::for_database(database), |attempt| {
                metrics.record_db_connect_attempt();
                tracing::info!(attempt = attempt, "Connecting to PostgreSQL");
                PostgresCustomerRepository::connect(database)
            })
            .await
            .into_result()?;

            repository.ensure_schema().await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(repository))
        }
    }
}
