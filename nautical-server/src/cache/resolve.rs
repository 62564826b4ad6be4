//! Fetch-on-miss lookup of individual station observations.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{BuoySnapshot, StationId};
use crate::ndbc::NdbcError;

use super::provider::BuoyProvider;
use super::store::BuoyCache;

impl<P: BuoyProvider> BuoyCache<P> {
    /// Get the latest observation for a station.
    ///
    /// Returns `None` for stations not listed by the last refresh. A known
    /// station is fetched from the provider the first time it is read in a
    /// cycle and served from the cache afterwards; concurrent first reads
    /// wait on the same fetch. The provider call runs with no table lock
    /// held. A fetch still running when the next refresh lands is handed to
    /// its callers but never served to later reads. Failures are logged
    /// and not cached, so the next read tries again.
    pub async fn station(&self, id: &StationId) -> Option<Arc<BuoySnapshot>> {
        let slot = self.stations.read().await.get(id)?.clone();

        let resolved = slot
            .0
            .get_or_try_init(|| async {
                let snapshot = timeout(self.config.fetch_timeout, self.provider.fetch_station(id))
                    .await
                    .map_err(|_| NdbcError::Timeout(self.config.fetch_timeout))??;

                debug!(station = %id, "resolved station");
                self.persistence.insert_station(&snapshot);
                Ok::<_, NdbcError>(Arc::new(snapshot))
            })
            .await;

        match resolved {
            Ok(snapshot) => Some(Arc::clone(snapshot)),
            Err(e) => {
                warn!(station = %id, error = %e, "station fetch failed");
                None
            }
        }
    }
}
