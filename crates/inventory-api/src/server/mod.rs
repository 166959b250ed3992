//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use inventory_common::{AppConfig, AppError};
use inventory_core::SnowflakeGenerator;
use inventory_db::{
    create_pool, run_migrations, MemoryStore, PgInventoryLogRepository, PgInventoryRepository,
    PgMaterialRepository,
};
use inventory_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes skip rate limiting so probes keep working under load.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes());

    Ok(api.merge(health).with_state(state))
}

/// Initialize all dependencies and create AppState
///
/// Without `DATABASE_URL` the ledger runs on the in-memory store.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let builder = ServiceContextBuilder::new()
        .snowflake_generator(snowflake_generator)
        .ledger(config.ledger.clone());

    let (builder, pool) = if let Some(database) = &config.database {
        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&database.into())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
        info!("PostgreSQL connection established");

        let builder = builder
            .inventory_repo(Arc::new(PgInventoryRepository::new(pool.clone())))
            .log_repo(Arc::new(PgInventoryLogRepository::new(pool.clone())))
            .material_repo(Arc::new(PgMaterialRepository::new(pool.clone())));
        (builder, Some(pool))
    } else {
        warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
        let store = MemoryStore::new();
        let builder = builder
            .inventory_repo(Arc::new(store.inventories()))
            .log_repo(Arc::new(store.logs()))
            .material_repo(Arc::new(store.materials()));
        (builder, None)
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Run the HTTP server until Ctrl+C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::internal)?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
