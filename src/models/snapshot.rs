//! A validated, read-only view of both collections at one instant.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;

use super::inventory::InventoryRecord;
use super::warehouse::Warehouse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    #[serde(default)]
    pub inventory: Vec<InventoryRecord>,
}

impl Snapshot {
    /// Validate both collections before any aggregation runs over them.
    pub fn new(inventory: Vec<InventoryRecord>, warehouses: Vec<Warehouse>) -> Result<Self, AppError> {
        let snapshot = Self {
            warehouses,
            inventory,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parse a JSON fixture. Numbers given as strings are rejected, not coerced.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let parsed: Self = serde_json::from_str(raw)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks every item, unique warehouse ids, and that total stock and total
    /// capacity both fit in `i64`. All values are non-negative, so every
    /// partial sum the aggregations take fits as well.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::with_capacity(self.warehouses.len());
        let mut total_capacity: i64 = 0;
        for (index, warehouse) in self.warehouses.iter().enumerate() {
            warehouse
                .validate()
                .map_err(|e| AppError::Validation(format!("warehouses[{index}]: {e}")))?;
            if !seen.insert(warehouse.warehouse_id.as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate warehouse_id '{}'",
                    warehouse.warehouse_id
                )));
            }
            total_capacity = total_capacity
                .checked_add(warehouse.capacity)
                .ok_or_else(|| out_of_range("warehouses", index, "capacity"))?;
        }

        let mut total_stock: i64 = 0;
        for (index, record) in self.inventory.iter().enumerate() {
            record
                .validate()
                .map_err(|e| AppError::Validation(format!("inventory[{index}]: {e}")))?;
            total_stock = total_stock
                .checked_add(record.current_stock)
                .ok_or_else(|| out_of_range("inventory", index, "stock"))?;
        }

        Ok(())
    }
}

fn out_of_range(collection: &str, index: usize, what: &str) -> AppError {
    AppError::Validation(format!(
        "{collection}[{index}]: total {what} exceeds the supported range"
    ))
}
