//! Route definitions
//!
//! All API routes mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{health, inventory, inventory_logs};
use crate::state::AppState;

/// Create the main API router (health routes are kept apart so they skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(inventory_routes())
        .merge(inventory_log_routes())
}

/// Inventory routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/inventory",
            get(inventory::list_inventory).post(inventory::create_inventory),
        )
        // Batch operations (static segments win over :material_id)
        .route("/inventory/batch/adjust", post(inventory::batch_adjust))
        .route("/inventory/batch/inbound", post(inventory::batch_inbound))
        .route("/inventory/batch/outbound", post(inventory::batch_outbound))
        // Single record
        .route("/inventory/:material_id", get(inventory::get_inventory))
        .route("/inventory/:material_id/adjust", post(inventory::adjust_inventory))
        .route("/inventory/:material_id/inbound", post(inventory::inbound))
        .route("/inventory/:material_id/outbound", post(inventory::outbound))
        .route("/inventory/:material_id/price", patch(inventory::update_price))
        .route("/inventory/:material_id/status", patch(inventory::update_status))
}

/// Audit log routes
fn inventory_log_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory-logs", get(inventory_logs::list_logs))
        .route("/inventory-logs/expired", delete(inventory_logs::purge_expired_logs))
}
