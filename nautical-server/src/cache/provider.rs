//! The upstream boundary the cache pulls from.

use std::future::Future;

use crate::domain::{BuoySnapshot, Source, StationId};
use crate::ndbc::NdbcError;

/// Trait for providing station groupings and observations.
///
/// This abstraction allows the cache to be tested with fake data. Every
/// error is treated as transient by the cache.
pub trait BuoyProvider: Send + Sync + 'static {
    /// List every source with the stations it groups.
    ///
    /// Duplicate source names are tolerated; the last one wins.
    fn list_sources(&self) -> impl Future<Output = Result<Vec<Source>, NdbcError>> + Send;

    /// Fetch the latest observation for a station.
    fn fetch_station(
        &self,
        station: &StationId,
    ) -> impl Future<Output = Result<BuoySnapshot, NdbcError>> + Send;
}
