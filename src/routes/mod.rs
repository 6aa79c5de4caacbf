//! Route definitions for the InvenX API.

pub mod health;
pub mod inventory;
pub mod warehouses;

use axum::{
    http::{Method, Uri},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::AppState;

/// Build the full application router. Shared by the server binary and tests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.frontend_origin.clone())
        .allow_methods([Method::GET]);

    let api_routes = Router::new()
        .route("/total-inventory", get(inventory::total_inventory))
        .route("/product-stock", get(inventory::product_stock))
        .route("/warehouse-stock", get(warehouses::warehouse_stock))
        .route("/warehouse-utilization", get(warehouses::warehouse_utilization))
        .route("/overall-utilization", get(warehouses::overall_utilization))
        .route("/warehouses", get(warehouses::list))
        .route("/warehouse-count", get(warehouses::count))
        .route("/warehouse-details", get(warehouses::details))
        .route("/available-storage", get(warehouses::available_storage))
        .route("/system-summary", get(warehouses::system_summary))
        .route("/under-utilized", get(warehouses::under_utilized))
        .route("/storage-overload", get(warehouses::storage_overload));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
