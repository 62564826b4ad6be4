//! In-memory snapshot of sources, aliases and station observations.
//!
//! The cache is the only writer. Sources and aliases are replaced together
//! under one write lock so readers never see one without the other. The
//! station table sits behind a second lock; it is rebuilt right after the
//! sources and filled in lazily as stations are read.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::{BuoySnapshot, Source, StationId, alias_for};
use crate::ndbc::NdbcError;

use super::config::CacheConfig;
use super::persist::{NoopPersistence, Persistence};
use super::provider::BuoyProvider;
use super::subscribers::{SubscribeError, Subscribers};

/// Sources keyed by name, plus the alias table derived from those names.
#[derive(Debug, Default)]
pub(super) struct SourceTable {
    pub(super) sources: BTreeMap<String, Source>,
    pub(super) aliases: BTreeMap<String, String>,
}

impl SourceTable {
    /// Build a table from a provider listing, dropping excluded sources.
    /// A repeated name replaces the earlier entry.
    fn build(listed: Vec<Source>, config: &CacheConfig) -> Self {
        let mut sources = BTreeMap::new();
        for source in listed {
            if config.is_excluded(&source.name) {
                debug!(source = %source.name, "skipping excluded source");
                continue;
            }
            sources.insert(source.name.clone(), source);
        }

        let mut aliases = BTreeMap::new();
        for name in sources.keys() {
            let alias = alias_for(name);
            if let Some(previous) = aliases.insert(alias.clone(), name.clone()) {
                warn!(
                    alias = %alias,
                    replaced = %previous,
                    source = %name,
                    "alias collision, keeping the later source"
                );
            }
        }

        Self { sources, aliases }
    }

    /// Every station across all sources, each with an empty slot.
    fn station_slots(&self) -> BTreeMap<StationId, Slot> {
        self.sources
            .values()
            .flat_map(|source| source.stations.iter().cloned())
            .map(|station| (station, Slot::default()))
            .collect()
    }
}

/// Cache state for one station in one refresh cycle.
///
/// Empty until the first successful fetch. Concurrent readers of an empty
/// slot share a single provider call. A refresh swaps in new slots, so a
/// fetch that outlives its cycle only fills a slot nobody can reach.
#[derive(Debug, Clone, Default)]
pub(super) struct Slot(pub(super) Arc<OnceCell<Arc<BuoySnapshot>>>);

/// Process-wide cache of NDBC sources and station observations.
///
/// Construct one and share it behind an `Arc`; `BuoyService` drives its
/// refresh cycle.
pub struct BuoyCache<P> {
    pub(super) provider: P,
    pub(super) config: CacheConfig,
    pub(super) sources: RwLock<SourceTable>,
    pub(super) stations: RwLock<BTreeMap<StationId, Slot>>,
    pub(super) subscribers: Subscribers,
    pub(super) persistence: Box<dyn Persistence>,
}

impl<P: BuoyProvider> BuoyCache<P> {
    /// Create an empty cache. Nothing is fetched until the first refresh.
    pub fn new(provider: P, config: CacheConfig) -> Self {
        Self {
            provider,
            config,
            sources: RwLock::new(SourceTable::default()),
            stations: RwLock::new(BTreeMap::new()),
            subscribers: Subscribers::new(),
            persistence: Box::new(NoopPersistence),
        }
    }

    /// Attach a persistence backend.
    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Box::new(persistence);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Pull the source listing and replace the cached sources.
    ///
    /// On success, aliases are regenerated, every station is reset to
    /// unresolved and subscribers are notified. Returns the number of
    /// sources kept. On failure nothing is replaced and the previous
    /// snapshot keeps being served.
    pub async fn refresh_sources(&self) -> Result<usize, NdbcError> {
        let listed = timeout(self.config.fetch_timeout, self.provider.list_sources())
            .await
            .map_err(|_| NdbcError::Timeout(self.config.fetch_timeout))??;

        let table = SourceTable::build(listed, &self.config);
        let slots = table.station_slots();
        let source_count = table.sources.len();
        let station_count = slots.len();

        for source in table.sources.values() {
            self.persistence.insert_source(source);
        }

        *self.sources.write().await = table;
        *self.stations.write().await = slots;

        info!(
            sources = source_count,
            stations = station_count,
            "refreshed sources"
        );

        self.subscribers.notify_all();
        Ok(source_count)
    }

    /// Names of all cached sources, sorted.
    pub async fn all_source_ids(&self) -> Vec<String> {
        self.sources.read().await.sources.keys().cloned().collect()
    }

    /// Alias → source name.
    pub async fn aliases(&self) -> BTreeMap<String, String> {
        self.sources.read().await.aliases.clone()
    }

    /// Look up a source by its provider name.
    pub async fn source(&self, name: &str) -> Option<Source> {
        self.sources.read().await.sources.get(name).cloned()
    }

    /// Look up a source by alias, resolving both under one read lock.
    pub async fn source_by_alias(&self, alias: &str) -> Option<Source> {
        let table = self.sources.read().await;
        let name = table.aliases.get(alias)?;
        table.sources.get(name).cloned()
    }

    /// Every station known from the last refresh, sorted and de-duplicated.
    pub async fn all_station_ids(&self) -> Vec<StationId> {
        self.stations.read().await.keys().cloned().collect()
    }

    pub async fn source_count(&self) -> usize {
        self.sources.read().await.sources.len()
    }

    pub async fn station_count(&self) -> usize {
        self.stations.read().await.len()
    }

    /// Register a refresh listener under a generated id.
    pub fn subscribe<F>(&self, callback: F) -> Result<String, SubscribeError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Register a refresh listener under a caller-chosen id.
    pub fn subscribe_with_id<F>(
        &self,
        id: impl Into<String>,
        callback: F,
    ) -> Result<String, SubscribeError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe_with_id(id, callback)
    }

    pub fn unsubscribe(&self, id: &str) -> bool {
        self.subscribers.unsubscribe(id)
    }
}
