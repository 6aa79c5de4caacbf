//! Capacity utilization as an exact percentage value.

use std::fmt;

use serde::{Serialize, Serializer};

/// Stock over capacity, kept in hundredths of a percent so formatting is exact.
///
/// Serializes as `"50.00%"`, or as the sentinel `"N/A"` when capacity is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Utilization {
    Percent { hundredths: i64 },
    NotApplicable,
}

impl Utilization {
    pub const SENTINEL: &'static str = "N/A";

    /// `stock / capacity * 100`, rounded half up to two decimals.
    pub fn of(stock: i64, capacity: i64) -> Self {
        if capacity <= 0 {
            return Self::NotApplicable;
        }
        let stock = i128::from(stock.max(0));
        let capacity = i128::from(capacity);
        let hundredths = (stock * 20_000 + capacity) / (2 * capacity);
        Self::Percent {
            hundredths: i64::try_from(hundredths).unwrap_or(i64::MAX),
        }
    }

    pub fn hundredths(&self) -> Option<i64> {
        match self {
            Self::Percent { hundredths } => Some(*hundredths),
            Self::NotApplicable => None,
        }
    }

    /// Converts a percentage threshold such as `90.0` into comparable hundredths.
    pub fn threshold_hundredths(percent: f64) -> i64 {
        (percent * 100.0).round() as i64
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent { hundredths } => {
                write!(f, "{}.{:02}%", hundredths / 100, hundredths % 100)
            }
            Self::NotApplicable => f.write_str(Self::SENTINEL),
        }
    }
}

impl Serialize for Utilization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
