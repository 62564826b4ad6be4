//! Latest observation reported by a station.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StationId;

/// The most recent observation row published for one station.
///
/// Measurement names are the provider's column headers (`WDIR`, `WSPD`,
/// `WVHT`, `ATMP`, ...). Columns the station did not report are absent
/// rather than present with a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuoySnapshot {
    pub station: StationId,

    /// When the observation was taken (UTC).
    pub observed_at: Option<DateTime<Utc>>,

    pub measurements: BTreeMap<String, f64>,
}

impl BuoySnapshot {
    /// Create a snapshot with no measurements.
    pub fn new(station: StationId, observed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            station,
            observed_at,
            measurements: BTreeMap::new(),
        }
    }

    /// Add a measurement, builder-style.
    pub fn with_measurement(mut self, name: impl Into<String>, value: f64) -> Self {
        self.measurements.insert(name.into(), value);
        self
    }

    /// Look up a measurement by column name.
    pub fn measurement(&self, name: &str) -> Option<f64> {
        self.measurements.get(name).copied()
    }
}
