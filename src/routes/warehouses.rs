//! Warehouse stock, utilization and storage routes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;
use crate::models::warehouse::{
    AvailableStorage, OverallUtilization, OverloadWarning, SystemSummary, Warehouse,
    WarehouseDetail, WarehouseStockSummary, WarehouseUtilization,
};
use crate::services::{aggregation, stock};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WarehouseStockResponse {
    pub warehouse_stock: Vec<WarehouseStockSummary>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseUtilizationResponse {
    pub warehouse_utilization: Vec<WarehouseUtilization>,
}

#[derive(Debug, Serialize)]
pub struct WarehousesResponse {
    pub warehouses: Vec<Warehouse>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseDetailsResponse {
    pub warehouses: Vec<WarehouseDetail>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseCountResponse {
    pub total_warehouses: i64,
}

#[derive(Debug, Serialize)]
pub struct UnderUtilizedResponse {
    pub threshold_percentage: f64,
    pub warehouses: Vec<WarehouseUtilization>,
}

#[derive(Debug, Serialize)]
pub struct StorageOverloadResponse {
    pub threshold_percentage: f64,
    pub warnings: Vec<OverloadWarning>,
}

/// Optional `?threshold=<percent>` override for the alert endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct ThresholdQuery {
    #[validate(range(min = 0.0, max = 1000.0, message = "threshold must be between 0 and 1000"))]
    pub threshold: Option<f64>,
}

impl ThresholdQuery {
    fn resolve(&self, default: f64) -> Result<f64, AppError> {
        self.validate()?;
        match self.threshold {
            Some(t) if !t.is_finite() => Err(AppError::Validation(
                "threshold must be a finite number".to_string(),
            )),
            Some(t) => Ok(t),
            None => Ok(default),
        }
    }
}

/// GET /api/warehouse-stock — total stock per warehouse id.
pub async fn warehouse_stock(
    State(state): State<AppState>,
) -> Result<Json<WarehouseStockResponse>, AppError> {
    let warehouse_stock = stock::warehouse_stock(&state.db).await?;
    Ok(Json(WarehouseStockResponse { warehouse_stock }))
}

/// GET /api/warehouse-utilization — utilization percentage per warehouse.
pub async fn warehouse_utilization(
    State(state): State<AppState>,
) -> Result<Json<WarehouseUtilizationResponse>, AppError> {
    let loads = stock::warehouse_loads(&state.db).await?;
    Ok(Json(WarehouseUtilizationResponse {
        warehouse_utilization: aggregation::utilization_of(&loads),
    }))
}

/// GET /api/overall-utilization — system-wide stock over capacity.
pub async fn overall_utilization(
    State(state): State<AppState>,
) -> Result<Json<OverallUtilization>, AppError> {
    let (loads, total) = stock::loads_with_total(&state.db).await?;
    Ok(Json(aggregation::overall_of(&loads, total)))
}

/// GET /api/warehouses — the warehouse registry.
pub async fn list(State(state): State<AppState>) -> Result<Json<WarehousesResponse>, AppError> {
    let warehouses = stock::list_warehouses(&state.db).await?;
    Ok(Json(WarehousesResponse { warehouses }))
}

/// GET /api/warehouse-count — number of registered warehouses.
pub async fn count(State(state): State<AppState>) -> Result<Json<WarehouseCountResponse>, AppError> {
    let total_warehouses = stock::count_warehouses(&state.db).await?;
    Ok(Json(WarehouseCountResponse { total_warehouses }))
}

/// GET /api/available-storage — free capacity per warehouse and overall.
pub async fn available_storage(
    State(state): State<AppState>,
) -> Result<Json<AvailableStorage>, AppError> {
    let (loads, total) = stock::loads_with_total(&state.db).await?;
    Ok(Json(aggregation::available_of(&loads, total)))
}

/// GET /api/system-summary — overall stock, capacity, utilization and free space.
pub async fn system_summary(
    State(state): State<AppState>,
) -> Result<Json<SystemSummary>, AppError> {
    let (loads, total) = stock::loads_with_total(&state.db).await?;
    Ok(Json(aggregation::summary_of(&loads, total)))
}

/// GET /api/warehouse-details — registry entries joined with their figures.
pub async fn details(
    State(state): State<AppState>,
) -> Result<Json<WarehouseDetailsResponse>, AppError> {
    let loads = stock::warehouse_loads(&state.db).await?;
    Ok(Json(WarehouseDetailsResponse {
        warehouses: aggregation::details_of(&loads),
    }))
}

/// GET /api/under-utilized — warehouses below the utilization threshold.
pub async fn under_utilized(
    State(state): State<AppState>,
    query: Result<Query<ThresholdQuery>, QueryRejection>,
) -> Result<Json<UnderUtilizedResponse>, AppError> {
    let Query(query) = query?;
    let threshold = query.resolve(state.config.under_utilized_threshold)?;
    let loads = stock::warehouse_loads(&state.db).await?;
    Ok(Json(UnderUtilizedResponse {
        threshold_percentage: threshold,
        warehouses: aggregation::under_utilized(&loads, threshold),
    }))
}

/// GET /api/storage-overload — warehouses near or beyond capacity.
pub async fn storage_overload(
    State(state): State<AppState>,
    query: Result<Query<ThresholdQuery>, QueryRejection>,
) -> Result<Json<StorageOverloadResponse>, AppError> {
    let Query(query) = query?;
    let threshold = query.resolve(state.config.overload_threshold)?;
    let loads = stock::warehouse_loads(&state.db).await?;
    Ok(Json(StorageOverloadResponse {
        threshold_percentage: threshold,
        warnings: aggregation::overload_warnings(&loads, threshold),
    }))
}
