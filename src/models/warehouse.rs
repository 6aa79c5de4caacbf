//! Warehouse registry model and the per-warehouse figures derived from it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::utilization::Utilization;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Warehouse {
    #[validate(length(min = 1, message = "warehouse_id must not be empty"))]
    pub warehouse_id: String,
    pub name: String,
    pub location: Option<String>,
    #[validate(range(min = 0, message = "capacity must be non-negative"))]
    pub capacity: i64,
    #[validate(range(min = 0.0, message = "ordering_cost must be non-negative"))]
    pub ordering_cost: Option<f64>,
}

impl Warehouse {
    /// Bare warehouse with only an id and capacity, named after its id.
    pub fn with_capacity(warehouse_id: &str, capacity: i64) -> Self {
        Self {
            warehouse_id: warehouse_id.to_string(),
            name: warehouse_id.to_string(),
            location: None,
            capacity,
            ordering_cost: None,
        }
    }
}

/// Stock summed over every inventory record of one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WarehouseStockSummary {
    #[serde(rename = "_id")]
    pub warehouse_id: String,
    pub total_stock: i64,
}

/// A registered warehouse joined with the stock it currently holds.
///
/// Warehouses without inventory carry `total_stock = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WarehouseLoad {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub total_stock: i64,
}

impl WarehouseLoad {
    pub fn utilization(&self) -> Utilization {
        Utilization::of(self.total_stock, self.warehouse.capacity)
    }

    /// Free capacity; negative when the warehouse is overstocked.
    pub fn available_storage(&self) -> i64 {
        self.warehouse.capacity - self.total_stock
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseUtilization {
    pub warehouse_id: String,
    pub utilization_percentage: Utilization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseAvailability {
    pub warehouse_id: String,
    pub capacity: i64,
    pub current_stock: i64,
    pub available_storage: i64,
}

/// Per-warehouse free capacity plus the system-wide remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableStorage {
    pub warehouses: Vec<WarehouseAvailability>,
    pub overall_available_storage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallUtilization {
    pub overall_stock: i64,
    pub overall_capacity: i64,
    pub overall_utilization_percentage: Utilization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemSummary {
    pub overall_stock: i64,
    pub overall_capacity: i64,
    pub overall_utilization_percentage: Utilization,
    pub overall_available_storage: i64,
}

/// Everything the warehouse page shows for a single warehouse card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseDetail {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub total_stock: i64,
    pub utilization_percentage: Utilization,
    pub available_storage: i64,
}

/// A warehouse whose stock is at or beyond the overload threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverloadWarning {
    pub warehouse_id: String,
    pub warehouse_name: String,
    pub utilization_percentage: Utilization,
    pub available_storage: i64,
    pub message: String,
}
