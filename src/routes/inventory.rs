//! Inventory totals: system-wide and per product.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::inventory::ProductStockSummary;
use crate::services::stock;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TotalInventoryResponse {
    pub total_inventory: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductStockResponse {
    pub product_stock: Vec<ProductStockSummary>,
}

/// GET /api/total-inventory — sum of stock across all inventory records.
pub async fn total_inventory(
    State(state): State<AppState>,
) -> Result<Json<TotalInventoryResponse>, AppError> {
    let total_inventory = stock::total_inventory(&state.db).await?;
    Ok(Json(TotalInventoryResponse { total_inventory }))
}

/// GET /api/product-stock — stock per product summed over warehouses.
pub async fn product_stock(
    State(state): State<AppState>,
) -> Result<Json<ProductStockResponse>, AppError> {
    let product_stock = stock::product_stock(&state.db).await?;
    Ok(Json(ProductStockResponse { product_stock }))
}
