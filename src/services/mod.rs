//! Business logic services.

pub mod aggregation;
pub mod stock;
