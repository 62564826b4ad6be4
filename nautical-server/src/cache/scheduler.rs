//! Refresh timing.
//!
//! NDBC publishes new observations twice an hour and they take a few
//! minutes to settle, so refreshes aim for 5 and 35 minutes past the hour.
//! Each cycle computes its own delay from the wall clock rather than
//! ticking at a fixed rate.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::provider::BuoyProvider;
use super::store::BuoyCache;

/// Minutes past the hour at which fresh data is expected.
pub const CHECKPOINTS: [u32; 2] = [5, 35];

/// Minutes to wait from `minute` (0-59) until the next checkpoint.
///
/// Always in `1..=30`. Exactly on a checkpoint the answer is 30, the
/// following checkpoint, never zero.
pub fn wait_minutes(minute: u32) -> u32 {
    let delta = 65u32.abs_diff(minute) % 30;
    if delta == 0 { 30 } else { delta }
}

/// Delay from `now` until the next checkpoint, at minute granularity.
pub fn delay_until_next_checkpoint<T: Timelike>(now: &T) -> Duration {
    Duration::from_secs(u64::from(wait_minutes(now.minute())) * 60)
}

/// Wall-clock source used to place the next checkpoint.
pub type Clock = fn() -> DateTime<Utc>;

/// Runs refresh cycles against a cache.
pub struct Scheduler<P> {
    cache: Arc<BuoyCache<P>>,
    clock: Clock,
}

impl<P: BuoyProvider> Scheduler<P> {
    pub fn new(cache: Arc<BuoyCache<P>>) -> Self {
        Self {
            cache,
            clock: Utc::now,
        }
    }

    /// Use a different wall clock (NDBC publishes on UTC minutes).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run one refresh and return how long to wait before the next.
    ///
    /// A failed refresh is logged and retried after the configured retry
    /// interval instead of at the next checkpoint.
    pub async fn run_once(&self) -> Duration {
        match self.cache.refresh_sources().await {
            Ok(_) => {
                let delay = delay_until_next_checkpoint(&(self.clock)());
                debug!(delay_secs = delay.as_secs(), "next refresh scheduled");
                delay
            }
            Err(e) => {
                let delay = self.cache.config().retry_interval;
                warn!(error = %e, retry_secs = delay.as_secs(), "refresh failed, retrying");
                delay
            }
        }
    }

    /// Sleep for `first_delay`, refresh, and repeat until `shutdown` turns
    /// true or its sender is dropped.
    ///
    /// The flag is checked before every cycle, so a stop requested while a
    /// cycle is in flight lets that cycle finish and then exits.
    pub async fn run(self, first_delay: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut deadline = Instant::now() + first_delay;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = sleep_until(deadline) => {}
            }

            if *shutdown.borrow() {
                break;
            }

            let delay = self.run_once().await;
            deadline = Instant::now() + delay;
        }

        info!("refresh loop exited");
    }
}
