//! Seed script for development — replaces both tables with a JSON fixture.
//!
//! Usage: `cargo run --bin seed [path/to/fixture.json]`
//!
//! Without a path the bundled `fixtures/sample.json` is loaded. Requires
//! `DATABASE_URL` (reads .env).

use invenx::models::snapshot::Snapshot;
use invenx::services::{aggregation, stock};
use sqlx::PgPool;

const SAMPLE_FIXTURE: &str = include_str!("../../fixtures/sample.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = invenx::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    invenx::db::run_migrations(&pool).await?;

    println!("=== InvenX Seed Script ===");

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            println!("[load] {path}");
            std::fs::read_to_string(&path)?
        }
        None => {
            println!("[load] bundled sample fixture");
            SAMPLE_FIXTURE.to_string()
        }
    };
    let snapshot = Snapshot::from_json(&raw)?;

    replace_tables(&pool, &snapshot).await?;
    println!(
        "[done] Inserted {} warehouses and {} inventory records",
        snapshot.warehouses.len(),
        snapshot.inventory.len()
    );

    // Read back and report what the API will serve
    let stored = stock::load_snapshot(&pool).await?;
    let summary = aggregation::system_summary(&stored.inventory, &stored.warehouses);
    println!(
        "[check] stock {} / capacity {} ({}), {} slots free",
        summary.overall_stock,
        summary.overall_capacity,
        summary.overall_utilization_percentage,
        summary.overall_available_storage
    );

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn replace_tables(pool: &PgPool, snapshot: &Snapshot) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM inventory").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM warehouse").execute(&mut *tx).await?;

    for warehouse in &snapshot.warehouses {
        sqlx::query(
            "INSERT INTO warehouse (warehouse_id, name, location, capacity, ordering_cost)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&warehouse.warehouse_id)
        .bind(&warehouse.name)
        .bind(&warehouse.location)
        .bind(warehouse.capacity)
        .bind(warehouse.ordering_cost)
        .execute(&mut *tx)
        .await?;
    }

    for record in &snapshot.inventory {
        sqlx::query(
            "INSERT INTO inventory (product_id, warehouse_id, current_stock) VALUES ($1, $2, $3)",
        )
        .bind(&record.product_id)
        .bind(&record.warehouse_id)
        .bind(record.current_stock)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
