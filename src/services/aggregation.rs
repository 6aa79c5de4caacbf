//! Stock and capacity aggregation over an in-memory snapshot.
//!
//! Record-level functions (`total_inventory`, `utilization_by_warehouse`, ...)
//! take raw collections. Load-level functions (`utilization_of`, `overall_of`,
//! ...) take warehouses already joined with their stock, which is what the
//! database query returns, so both paths share one set of formulas.
//!
//! The join is warehouse-driven: every registered warehouse appears in the
//! output, with zero stock when no inventory references it. Inputs are
//! expected to have passed [`Snapshot`](crate::models::snapshot::Snapshot)
//! validation, which bounds total stock and total capacity to `i64` so none of
//! the sums below can overflow.

use std::collections::BTreeMap;

use crate::models::inventory::{InventoryRecord, ProductStockSummary};
use crate::models::utilization::Utilization;
use crate::models::warehouse::{
    AvailableStorage, OverallUtilization, OverloadWarning, SystemSummary, Warehouse,
    WarehouseAvailability, WarehouseDetail, WarehouseLoad, WarehouseStockSummary,
    WarehouseUtilization,
};

/// Sum of `current_stock` across all records; `0` for an empty set.
pub fn total_inventory(records: &[InventoryRecord]) -> i64 {
    records.iter().map(|r| r.current_stock).sum()
}

/// Group records by warehouse and sum their stock.
pub fn stock_by_warehouse(records: &[InventoryRecord]) -> BTreeMap<String, i64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.warehouse_id.clone()).or_insert(0) += record.current_stock;
    }
    totals
}

/// Per-warehouse stock covering both registered warehouses (zero-filled)
/// and warehouse ids that only appear in inventory. Sorted by id.
pub fn warehouse_stock(
    records: &[InventoryRecord],
    warehouses: &[Warehouse],
) -> Vec<WarehouseStockSummary> {
    let mut totals = stock_by_warehouse(records);
    for warehouse in warehouses {
        totals.entry(warehouse.warehouse_id.clone()).or_insert(0);
    }
    totals
        .into_iter()
        .map(|(warehouse_id, total_stock)| WarehouseStockSummary {
            warehouse_id,
            total_stock,
        })
        .collect()
}

/// Total stock per product across every warehouse. Sorted by product id.
pub fn stock_by_product(records: &[InventoryRecord]) -> Vec<ProductStockSummary> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.product_id.as_str()).or_insert(0) += record.current_stock;
    }
    totals
        .into_iter()
        .map(|(product_id, total_stock)| ProductStockSummary {
            product_id: product_id.to_string(),
            total_stock,
        })
        .collect()
}

/// Join warehouses with grouped stock, preserving warehouse order.
pub fn join_stock(warehouses: &[Warehouse], stock: &BTreeMap<String, i64>) -> Vec<WarehouseLoad> {
    warehouses
        .iter()
        .map(|warehouse| WarehouseLoad {
            warehouse: warehouse.clone(),
            total_stock: stock.get(&warehouse.warehouse_id).copied().unwrap_or(0),
        })
        .collect()
}

/// Join raw records onto warehouses.
pub fn loads(records: &[InventoryRecord], warehouses: &[Warehouse]) -> Vec<WarehouseLoad> {
    join_stock(warehouses, &stock_by_warehouse(records))
}

pub fn utilization_by_warehouse(
    records: &[InventoryRecord],
    warehouses: &[Warehouse],
) -> Vec<WarehouseUtilization> {
    utilization_of(&loads(records, warehouses))
}

pub fn overall_utilization(records: &[InventoryRecord], warehouses: &[Warehouse]) -> OverallUtilization {
    overall_of(&loads(records, warehouses), total_inventory(records))
}

pub fn available_storage(records: &[InventoryRecord], warehouses: &[Warehouse]) -> AvailableStorage {
    available_of(&loads(records, warehouses), total_inventory(records))
}

pub fn system_summary(records: &[InventoryRecord], warehouses: &[Warehouse]) -> SystemSummary {
    summary_of(&loads(records, warehouses), total_inventory(records))
}

pub fn utilization_of(loads: &[WarehouseLoad]) -> Vec<WarehouseUtilization> {
    loads
        .iter()
        .map(|load| WarehouseUtilization {
            warehouse_id: load.warehouse.warehouse_id.clone(),
            utilization_percentage: load.utilization(),
        })
        .collect()
}

fn overall_capacity(loads: &[WarehouseLoad]) -> i64 {
    loads.iter().map(|load| load.warehouse.capacity).sum()
}

/// `overall_stock` is the full inventory total, including stock held under
/// warehouse ids with no registered warehouse.
pub fn overall_of(loads: &[WarehouseLoad], overall_stock: i64) -> OverallUtilization {
    let overall_capacity = overall_capacity(loads);
    OverallUtilization {
        overall_stock,
        overall_capacity,
        overall_utilization_percentage: Utilization::of(overall_stock, overall_capacity),
    }
}

pub fn available_of(loads: &[WarehouseLoad], overall_stock: i64) -> AvailableStorage {
    let warehouses = loads
        .iter()
        .map(|load| WarehouseAvailability {
            warehouse_id: load.warehouse.warehouse_id.clone(),
            capacity: load.warehouse.capacity,
            current_stock: load.total_stock,
            available_storage: load.available_storage(),
        })
        .collect();

    AvailableStorage {
        warehouses,
        overall_available_storage: overall_capacity(loads) - overall_stock,
    }
}

pub fn summary_of(loads: &[WarehouseLoad], overall_stock: i64) -> SystemSummary {
    let overall = overall_of(loads, overall_stock);
    SystemSummary {
        overall_stock,
        overall_capacity: overall.overall_capacity,
        overall_utilization_percentage: overall.overall_utilization_percentage,
        overall_available_storage: overall.overall_capacity - overall_stock,
    }
}

pub fn details_of(loads: &[WarehouseLoad]) -> Vec<WarehouseDetail> {
    loads
        .iter()
        .map(|load| WarehouseDetail {
            warehouse: load.warehouse.clone(),
            total_stock: load.total_stock,
            utilization_percentage: load.utilization(),
            available_storage: load.available_storage(),
        })
        .collect()
}

/// Warehouses strictly below `threshold_percent` utilization.
/// Zero-capacity warehouses have no utilization and are never listed.
pub fn under_utilized(loads: &[WarehouseLoad], threshold_percent: f64) -> Vec<WarehouseUtilization> {
    let threshold = Utilization::threshold_hundredths(threshold_percent);
    utilization_of(loads)
        .into_iter()
        .filter(|u| matches!(u.utilization_percentage.hundredths(), Some(h) if h < threshold))
        .collect()
}

/// Warehouses at or above `threshold_percent`, plus any that are overstocked
/// (including zero-capacity warehouses holding stock).
pub fn overload_warnings(loads: &[WarehouseLoad], threshold_percent: f64) -> Vec<OverloadWarning> {
    let threshold = Utilization::threshold_hundredths(threshold_percent);
    loads
        .iter()
        .filter_map(|load| {
            let utilization = load.utilization();
            let available = load.available_storage();
            let message = if available < 0 {
                format!(
                    "Overstocked by {} units ({} stored, capacity {})",
                    -available, load.total_stock, load.warehouse.capacity
                )
            } else if matches!(utilization.hundredths(), Some(h) if h >= threshold) {
                format!(
                    "Utilization {utilization} at or above {threshold_percent}% threshold, {available} units free"
                )
            } else {
                return None;
            };

            Some(OverloadWarning {
                warehouse_id: load.warehouse.warehouse_id.clone(),
                warehouse_name: load.warehouse.name.clone(),
                utilization_percentage: utilization,
                available_storage: available,
                message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario() -> (Vec<InventoryRecord>, Vec<Warehouse>) {
        (
            vec![
                InventoryRecord::new("P1", "A", 30),
                InventoryRecord::new("P2", "A", 20),
                InventoryRecord::new("P1", "B", 10),
            ],
            vec![Warehouse::with_capacity("A", 100), Warehouse::with_capacity("B", 50)],
        )
    }

    #[test]
    fn scenario_totals() {
        let (records, warehouses) = scenario();

        assert_eq!(total_inventory(&records), 60);

        let stock = stock_by_warehouse(&records);
        assert_eq!(stock.get("A"), Some(&50));
        assert_eq!(stock.get("B"), Some(&10));

        let utilization = utilization_by_warehouse(&records, &warehouses);
        let rendered: Vec<(String, String)> = utilization
            .iter()
            .map(|u| (u.warehouse_id.clone(), u.utilization_percentage.to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("A".to_string(), "50.00%".to_string()),
                ("B".to_string(), "20.00%".to_string()),
            ]
        );

        let overall = overall_utilization(&records, &warehouses);
        assert_eq!(overall.overall_stock, 60);
        assert_eq!(overall.overall_capacity, 150);
        assert_eq!(overall.overall_utilization_percentage.to_string(), "40.00%");

        let available = available_storage(&records, &warehouses);
        assert_eq!(available.warehouses[0].available_storage, 50);
        assert_eq!(available.warehouses[1].available_storage, 40);
        assert_eq!(available.overall_available_storage, 90);
    }

    #[test]
    fn empty_inventory_totals_zero() {
        assert_eq!(total_inventory(&[]), 0);
        assert!(stock_by_warehouse(&[]).is_empty());
    }

    #[test]
    fn warehouse_without_inventory_has_zero_stock() {
        let records = vec![InventoryRecord::new("P1", "A", 5)];
        let warehouses = vec![Warehouse::with_capacity("A", 10), Warehouse::with_capacity("C", 40)];

        let joined = loads(&records, &warehouses);
        assert_eq!(joined[1].warehouse.warehouse_id, "C");
        assert_eq!(joined[1].total_stock, 0);

        let stock = warehouse_stock(&records, &warehouses);
        assert_eq!(
            stock,
            vec![
                WarehouseStockSummary { warehouse_id: "A".into(), total_stock: 5 },
                WarehouseStockSummary { warehouse_id: "C".into(), total_stock: 0 },
            ]
        );
    }

    #[test]
    fn unregistered_warehouse_stock_counts_toward_totals() {
        let records = vec![InventoryRecord::new("P1", "A", 5), InventoryRecord::new("P1", "Z", 7)];
        let warehouses = vec![Warehouse::with_capacity("A", 10)];

        let stock = warehouse_stock(&records, &warehouses);
        assert_eq!(stock.iter().map(|s| s.total_stock).sum::<i64>(), 12);

        let overall = overall_utilization(&records, &warehouses);
        assert_eq!(overall.overall_stock, 12);
        assert_eq!(overall.overall_utilization_percentage.to_string(), "120.00%");
        assert_eq!(available_storage(&records, &warehouses).overall_available_storage, -2);
    }

    #[test]
    fn zero_capacity_yields_sentinel() {
        let warehouses = vec![Warehouse::with_capacity("E", 0)];
        let utilization = utilization_by_warehouse(&[], &warehouses);
        assert_eq!(utilization[0].utilization_percentage, Utilization::NotApplicable);

        let overall = overall_utilization(&[], &warehouses);
        let json = serde_json::to_value(&overall).unwrap();
        assert_eq!(json["overall_utilization_percentage"], "N/A");
        assert_eq!(json["overall_capacity"], 0);
    }

    #[test]
    fn overstock_gives_negative_available_storage() {
        let records = vec![InventoryRecord::new("P1", "A", 130)];
        let warehouses = vec![Warehouse::with_capacity("A", 100)];
        let available = available_storage(&records, &warehouses);
        assert_eq!(available.warehouses[0].available_storage, -30);
        assert_eq!(available.overall_available_storage, -30);
    }

    #[test]
    fn product_stock_spans_warehouses() {
        let (records, _) = scenario();
        let products = stock_by_product(&records);
        assert_eq!(
            products,
            vec![
                ProductStockSummary { product_id: "P1".into(), total_stock: 40 },
                ProductStockSummary { product_id: "P2".into(), total_stock: 20 },
            ]
        );
    }

    #[test]
    fn summary_combines_utilization_and_storage() {
        let (records, warehouses) = scenario();
        let summary = system_summary(&records, &warehouses);
        assert_eq!(summary.overall_stock, 60);
        assert_eq!(summary.overall_capacity, 150);
        assert_eq!(summary.overall_available_storage, 90);
    }

    #[test]
    fn details_include_warehouse_metadata() {
        let (records, mut warehouses) = scenario();
        warehouses[0].name = "Alpha".into();
        warehouses[0].location = Some("Pune".into());

        let details = details_of(&loads(&records, &warehouses));
        let json = serde_json::to_value(&details[0]).unwrap();
        assert_eq!(json["warehouse_id"], "A");
        assert_eq!(json["name"], "Alpha");
        assert_eq!(json["location"], "Pune");
        assert_eq!(json["total_stock"], 50);
        assert_eq!(json["utilization_percentage"], "50.00%");
        assert_eq!(json["available_storage"], 50);
    }

    #[test]
    fn under_utilized_excludes_zero_capacity() {
        let records = vec![InventoryRecord::new("P1", "A", 5), InventoryRecord::new("P1", "B", 40)];
        let warehouses = vec![
            Warehouse::with_capacity("A", 100),
            Warehouse::with_capacity("B", 100),
            Warehouse::with_capacity("E", 0),
        ];
        let flagged = under_utilized(&loads(&records, &warehouses), 20.0);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].warehouse_id, "A");
    }

    #[test]
    fn under_utilized_threshold_is_strict() {
        let records = vec![InventoryRecord::new("P1", "A", 20)];
        let warehouses = vec![Warehouse::with_capacity("A", 100)];
        assert!(under_utilized(&loads(&records, &warehouses), 20.0).is_empty());
        assert_eq!(under_utilized(&loads(&records, &warehouses), 20.01).len(), 1);
    }

    #[test]
    fn overload_warnings_cover_threshold_and_overstock() {
        let records = vec![
            InventoryRecord::new("P1", "A", 90),
            InventoryRecord::new("P1", "B", 60),
            InventoryRecord::new("P1", "E", 3),
            InventoryRecord::new("P1", "C", 10),
        ];
        let warehouses = vec![
            Warehouse::with_capacity("A", 100),
            Warehouse::with_capacity("B", 50),
            Warehouse::with_capacity("C", 100),
            Warehouse::with_capacity("E", 0),
        ];
        let warnings = overload_warnings(&loads(&records, &warehouses), 90.0);
        let ids: Vec<&str> = warnings.iter().map(|w| w.warehouse_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "E"]);

        assert_eq!(
            warnings[0].message,
            "Utilization 90.00% at or above 90% threshold, 10 units free"
        );
        assert_eq!(warnings[1].message, "Overstocked by 10 units (60 stored, capacity 50)");
        assert_eq!(warnings[2].utilization_percentage, Utilization::NotApplicable);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let (records, warehouses) = scenario();
        let first = serde_json::to_vec(&available_storage(&records, &warehouses)).unwrap();
        let second = serde_json::to_vec(&available_storage(&records, &warehouses)).unwrap();
        assert_eq!(first, second);

        let first = serde_json::to_vec(&warehouse_stock(&records, &warehouses)).unwrap();
        let second = serde_json::to_vec(&warehouse_stock(&records, &warehouses)).unwrap();
        assert_eq!(first, second);
    }

    fn arb_records() -> impl Strategy<Value = Vec<InventoryRecord>> {
        prop::collection::vec(
            ("P[0-9]", "W[0-4]", 0i64..1_000_000).prop_map(|(p, w, s)| InventoryRecord {
                product_id: p,
                warehouse_id: w,
                current_stock: s,
            }),
            0..50,
        )
    }

    fn arb_warehouses() -> impl Strategy<Value = Vec<Warehouse>> {
        prop::collection::btree_map("W[0-6]", 0i64..2_000_000, 0..7).prop_map(|m| {
            m.into_iter()
                .map(|(id, capacity)| Warehouse::with_capacity(&id, capacity))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 500,
            ..ProptestConfig::default()
        })]

        /// Property: total equals the plain sum of record stock.
        #[test]
        fn total_is_sum(records in arb_records()) {
            let expected: i64 = records.iter().map(|r| r.current_stock).sum();
            prop_assert_eq!(total_inventory(&records), expected);
        }

        /// Property: grouping never drops or double-counts records.
        #[test]
        fn grouping_partitions_records(records in arb_records(), warehouses in arb_warehouses()) {
            let by_warehouse: i64 = stock_by_warehouse(&records).values().sum();
            prop_assert_eq!(by_warehouse, total_inventory(&records));

            let combined: i64 = warehouse_stock(&records, &warehouses).iter().map(|s| s.total_stock).sum();
            prop_assert_eq!(combined, total_inventory(&records));

            let by_product: i64 = stock_by_product(&records).iter().map(|s| s.total_stock).sum();
            prop_assert_eq!(by_product, total_inventory(&records));
        }

        /// Property: available storage is exactly capacity minus stock.
        #[test]
        fn available_is_capacity_minus_stock(records in arb_records(), warehouses in arb_warehouses()) {
            let available = available_storage(&records, &warehouses);
            prop_assert_eq!(available.warehouses.len(), warehouses.len());
            for entry in &available.warehouses {
                prop_assert_eq!(entry.capacity - entry.current_stock, entry.available_storage);
            }
        }

        /// Property: utilization is round(S/C*100, 2), sentinel when C = 0.
        #[test]
        fn utilization_matches_rounded_ratio(records in arb_records(), warehouses in arb_warehouses()) {
            let stock = stock_by_warehouse(&records);
            for (warehouse, u) in warehouses.iter().zip(utilization_by_warehouse(&records, &warehouses)) {
                let s = stock.get(&warehouse.warehouse_id).copied().unwrap_or(0);
                if warehouse.capacity == 0 {
                    prop_assert_eq!(u.utilization_percentage, Utilization::NotApplicable);
                } else {
                    // Round half up: floor(s * 10000 / c + 1/2).
                    let (s, c) = (i128::from(s), i128::from(warehouse.capacity));
                    let expected = i64::try_from((s * 20_000 + c) / (2 * c)).unwrap();
                    prop_assert_eq!(u.utilization_percentage.hundredths(), Some(expected));
                }
            }
        }
    }
}
