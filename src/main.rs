use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod clients;
mod config;
mod domain;
mod metrics;
mod store;

use clients::{HttpProductCatalog, OpenCatalog, ProductCatalog};
use config::{Config, StorageBackend};
use domain::order::{OrderCommandHandler, OrderQueryHandler, RecordMapper, UuidCodec};
use store::{MemoryOrderRepository, OrderRepository, ScyllaOrderRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Structured logging; RUST_LOG overrides the configured default.
    // actix-web's access log reaches the subscriber through the log bridge.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("🚀 Starting order service");

    // === 1. Order store ===
    let repo: Arc<dyn OrderRepository> = match config.storage {
        StorageBackend::Scylla => Arc::new(
            ScyllaOrderRepository::connect(&config.scylla_nodes, &config.scylla_keyspace).await?,
        ),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory order store; orders are lost on restart");
            Arc::new(MemoryOrderRepository::new())
        }
    };

    // === 2. Product catalog ===
    let catalog: Arc<dyn ProductCatalog> = match &config.catalog_url {
        Some(url) => {
            tracing::info!(url = %url, "Checking products against catalog");
            Arc::new(HttpProductCatalog::new(url.as_str(), config.catalog_timeout())?)
        }
        None => {
            tracing::warn!("No product catalog configured; accepting every product");
            Arc::new(OpenCatalog)
        }
    };

    // === 3. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 4. Order handlers ===
    let codec = Arc::new(UuidCodec);
    let queries = OrderQueryHandler::new(repo.clone(), Arc::new(RecordMapper), codec.clone());
    let policy = config.policy();
    let commands = OrderCommandHandler::new(repo, codec, catalog, policy);
    tracing::info!(policy = ?policy, "Order handlers ready");

    let state = web::Data::new(api::AppState::new(queries, commands, metrics.clone()));
    let metrics_data = web::Data::new(metrics);

    // === 5. HTTP server ===
    let bind = (config.http_host.clone(), config.http_port);
    tracing::info!(host = %bind.0, port = bind.1, "📡 Serving order API");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(metrics_data.clone())
            .app_data(api::json_config())
            .configure(api::configure)
            .configure(metrics::configure)
    })
    .bind(bind)?
    .run()
    .await?;

    tracing::info!("Order service stopped");
    Ok(())
}
