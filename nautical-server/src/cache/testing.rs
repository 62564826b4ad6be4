//! Scriptable provider shared by the cache tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domain::{BuoySnapshot, Source, StationId};
use crate::ndbc::NdbcError;

use super::BuoyProvider;

#[derive(Default)]
struct FakeState {
    sources: Mutex<Vec<Source>>,
    stations: Mutex<HashMap<StationId, BuoySnapshot>>,
    sources_gate: Mutex<Option<Arc<Notify>>>,
    fail_sources: AtomicBool,
    fail_stations: AtomicBool,
    stall_stations: AtomicBool,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

/// In-memory provider with call counters. Clones share state, so a test
/// can keep a handle after moving one into the cache.
#[derive(Clone, Default)]
pub(crate) struct FakeProvider {
    state: Arc<FakeState>,
}

pub(crate) fn id(s: &str) -> StationId {
    StationId::parse(s).unwrap()
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Provider with `{"Alpha Group": ["101","102"], "Ships": ["900"]}`
    /// and an observation for each station.
    pub(crate) fn alpha_and_ships() -> Self {
        let provider = Self::new();
        provider.set_sources(&[("Alpha Group", &["101", "102"]), ("Ships", &["900"])]);
        for station in ["101", "102", "900"] {
            provider.add_observation(BuoySnapshot::new(id(station), None).with_measurement("WSPD", 5.0));
        }
        provider
    }

    pub(crate) fn set_sources(&self, sources: &[(&str, &[&str])]) {
        *self.state.sources.lock() = sources
            .iter()
            .map(|(name, stations)| Source::new(*name, stations.iter().map(|s| id(s)).collect()))
            .collect();
    }

    pub(crate) fn add_observation(&self, snapshot: BuoySnapshot) {
        self.state
            .stations
            .lock()
            .insert(snapshot.station.clone(), snapshot);
    }

    pub(crate) fn fail_sources(&self, fail: bool) {
        self.state.fail_sources.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_stations(&self, fail: bool) {
        self.state.fail_stations.store(fail, Ordering::SeqCst);
    }

    /// Make station fetches never complete.
    pub(crate) fn stall_stations(&self, stall: bool) {
        self.state.stall_stations.store(stall, Ordering::SeqCst);
    }

    /// Make the next source listing wait until the returned handle is
    /// notified. Later listings are not held.
    pub(crate) fn gate_next_listing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.state.sources_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.state.fetch_calls.load(Ordering::SeqCst)
    }
}

impl BuoyProvider for FakeProvider {
    async fn list_sources(&self) -> Result<Vec<Source>, NdbcError> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.state.sources_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.state.fail_sources.load(Ordering::SeqCst) {
            return Err(NdbcError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        let sources = self.state.sources.lock().clone();
        Ok(sources)
    }

    async fn fetch_station(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        self.state.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.stall_stations.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.state.fail_stations.load(Ordering::SeqCst) {
            return Err(NdbcError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        let snapshot = self.state.stations.lock().get(station).cloned();
        snapshot.ok_or_else(|| NdbcError::NotFound(station.to_string()))
    }
}
