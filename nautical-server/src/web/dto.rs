//! Response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response for `/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub refresh_cycles: u64,
    pub last_refresh: Option<DateTime<Utc>>,
    pub sources: usize,
    pub stations: usize,
}

/// One entry in the source listing.
#[derive(Debug, Serialize)]
pub struct SourceEntry {
    /// Source name as NDBC reports it
    pub id: String,

    /// URL-safe alias used by `/sources/{alias}`
    pub endpoint: String,
}

/// Response for `/sources`.
#[derive(Debug, Serialize)]
pub struct SourceListResponse {
    pub sources: Vec<SourceEntry>,
}

/// Response for `/buoys`.
#[derive(Debug, Serialize)]
pub struct BuoyListResponse {
    pub buoys: Vec<String>,
}
