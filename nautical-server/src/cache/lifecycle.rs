//! Start and stop of the background refresh loop.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::provider::BuoyProvider;
use super::scheduler::{Clock, Scheduler};
use super::store::BuoyCache;

struct Running {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Owns the refresh loop for a cache.
///
/// `run` and `stop` are the only lifecycle controls. Both are safe to call
/// in any order and any number of times.
pub struct BuoyService<P> {
    cache: Arc<BuoyCache<P>>,
    clock: Clock,
    state: Mutex<Option<Running>>,
}

impl<P: BuoyProvider> BuoyService<P> {
    pub fn new(cache: Arc<BuoyCache<P>>) -> Self {
        Self {
            cache,
            clock: chrono::Utc::now,
            state: Mutex::new(None),
        }
    }

    /// Use a different wall clock for checkpoint timing.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The cache this service refreshes.
    pub fn cache(&self) -> &Arc<BuoyCache<P>> {
        &self.cache
    }

    /// Run the first refresh cycle, then keep refreshing in the background.
    ///
    /// The cache is populated (or the first failure logged) by the time
    /// this returns. Calling it while already running logs a warning and
    /// does nothing.
    pub async fn run(&self) {
        let mut state = self.state.lock().await;
        if state.is_some() {
            warn!("refresh loop already running");
            return;
        }

        let scheduler = Scheduler::new(Arc::clone(&self.cache)).with_clock(self.clock);
        let delay = scheduler.run_once().await;

        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(scheduler.run(delay, rx));
        *state = Some(Running { shutdown, task });

        info!(next_refresh_secs = delay.as_secs(), "refresh loop started");
    }

    /// Stop the background loop.
    ///
    /// Waits for an in-flight cycle to finish; once this returns no further
    /// cycle will run. Stopping a service that is not running is a no-op.
    pub async fn stop(&self) {
        let Some(running) = self.state.lock().await.take() else {
            debug!("refresh loop not running");
            return;
        };

        // The loop may already have exited if its receiver is gone
        let _ = running.shutdown.send(true);
        if let Err(e) = running.task.await {
            warn!(error = %e, "refresh task ended abnormally");
        }

        info!("refresh loop stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.is_some()
    }
}
