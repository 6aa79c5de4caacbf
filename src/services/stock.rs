//! Read-only queries over the `inventory` and `warehouse` tables.
//!
//! Grouping and the warehouse/stock join run inside PostgreSQL; the
//! percentage math on top is done by [`super::aggregation`].

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::inventory::{InventoryRecord, ProductStockSummary};
use crate::models::snapshot::Snapshot;
use crate::models::warehouse::{Warehouse, WarehouseLoad, WarehouseStockSummary};

/// Sum of `current_stock` over all inventory rows.
pub async fn total_inventory(pool: &PgPool) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(current_stock), 0)::BIGINT FROM inventory",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Stock per warehouse id, zero-filled for registered warehouses without
/// inventory and including ids only present in inventory.
pub async fn warehouse_stock(pool: &PgPool) -> Result<Vec<WarehouseStockSummary>, AppError> {
    let rows = sqlx::query_as::<_, WarehouseStockSummary>(
        r#"
        SELECT
            COALESCE(w.warehouse_id, s.warehouse_id) AS warehouse_id,
            COALESCE(s.total_stock, 0)::BIGINT AS total_stock
        FROM warehouse w
        FULL OUTER JOIN (
            SELECT warehouse_id, SUM(current_stock) AS total_stock
            FROM inventory
            GROUP BY warehouse_id
        ) s ON s.warehouse_id = w.warehouse_id
        ORDER BY 1
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every registered warehouse joined with its stock, in one query.
pub async fn warehouse_loads(pool: &PgPool) -> Result<Vec<WarehouseLoad>, AppError> {
    let rows = sqlx::query_as::<_, WarehouseLoad>(
        r#"
        SELECT
            w.warehouse_id,
            w.name,
            w.location,
            w.capacity,
            w.ordering_cost,
            COALESCE(s.total_stock, 0)::BIGINT AS total_stock
        FROM warehouse w
        LEFT JOIN (
            SELECT warehouse_id, SUM(current_stock) AS total_stock
            FROM inventory
            GROUP BY warehouse_id
        ) s ON s.warehouse_id = w.warehouse_id
        ORDER BY w.warehouse_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Joined loads together with the full inventory total, fetched concurrently.
pub async fn loads_with_total(pool: &PgPool) -> Result<(Vec<WarehouseLoad>, i64), AppError> {
    tokio::try_join!(warehouse_loads(pool), total_inventory(pool))
}

/// Stock per product across all warehouses.
pub async fn product_stock(pool: &PgPool) -> Result<Vec<ProductStockSummary>, AppError> {
    let rows = sqlx::query_as::<_, ProductStockSummary>(
        r#"
        SELECT product_id, COALESCE(SUM(current_stock), 0)::BIGINT AS total_stock
        FROM inventory
        GROUP BY product_id
        ORDER BY product_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_warehouses(pool: &PgPool) -> Result<Vec<Warehouse>, AppError> {
    let rows = sqlx::query_as::<_, Warehouse>(
        r#"
        SELECT warehouse_id, name, location, capacity, ordering_cost
        FROM warehouse
        ORDER BY warehouse_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_warehouses(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warehouse")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn list_inventory(pool: &PgPool) -> Result<Vec<InventoryRecord>, AppError> {
    let rows = sqlx::query_as::<_, InventoryRecord>(
        "SELECT product_id, warehouse_id, current_stock FROM inventory ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Read both collections into a validated in-memory snapshot.
pub async fn load_snapshot(pool: &PgPool) -> Result<Snapshot, AppError> {
    let (inventory, warehouses) = tokio::try_join!(list_inventory(pool), list_warehouses(pool))?;
    stored_snapshot(inventory, warehouses)
}

/// Rows already in the database are not caller input, so a failed check is
/// reported as an internal fault rather than a 400.
fn stored_snapshot(
    inventory: Vec<InventoryRecord>,
    warehouses: Vec<Warehouse>,
) -> Result<Snapshot, AppError> {
    Snapshot::new(inventory, warehouses).map_err(|e| match e {
        AppError::Validation(msg) => AppError::Internal(format!("stored data is invalid: {msg}")),
        other => other,
    })
}
