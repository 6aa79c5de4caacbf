//! Inventory records: how much of a product one warehouse holds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct InventoryRecord {
    #[validate(length(min = 1, message = "product_id must not be empty"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "warehouse_id must not be empty"))]
    pub warehouse_id: String,
    #[validate(range(min = 0, message = "current_stock must be non-negative"))]
    pub current_stock: i64,
}

impl InventoryRecord {
    pub fn new(product_id: &str, warehouse_id: &str, current_stock: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            current_stock,
        }
    }
}

/// Total stock of one product summed across every warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductStockSummary {
    pub product_id: String,
    pub total_stock: i64,
}
