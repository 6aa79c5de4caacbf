//! Database models and derived aggregates for inventory and warehouses.

pub mod inventory;
pub mod snapshot;
pub mod utilization;
pub mod warehouse;
