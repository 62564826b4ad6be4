//! Application state for the web layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::cache::{BuoyCache, SubscribeError};
use crate::ndbc::Upstream;

/// Counters updated after every successful refresh.
#[derive(Debug, Default)]
pub struct RefreshStatus {
    cycles: AtomicU64,
    last_refresh: Mutex<Option<DateTime<Utc>>>,
}

impl RefreshStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed refresh at `at`.
    pub fn record(&self, at: DateTime<Utc>) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        *self.last_refresh.lock() = Some(at);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.lock()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<BuoyCache<Upstream>>,
    pub status: Arc<RefreshStatus>,
}

impl AppState {
    /// Create the state and subscribe its status counters to the cache.
    pub fn new(cache: Arc<BuoyCache<Upstream>>) -> Result<Self, SubscribeError> {
        let status = Arc::new(RefreshStatus::new());

        let recorder = Arc::clone(&status);
        cache.subscribe_with_id("web-status", move || recorder.record(Utc::now()))?;

        Ok(Self { cache, status })
    }
}
