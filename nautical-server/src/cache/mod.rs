//! Periodically refreshed cache of NDBC sources and observations.
//!
//! `BuoyService` drives a `Scheduler` that re-pulls the source listing at
//! each publication checkpoint. `BuoyCache` holds the listing, derives
//! aliases, fetches station observations on first read, and notifies
//! subscribers after every successful refresh.

mod config;
mod lifecycle;
mod persist;
mod provider;
mod resolve;
mod scheduler;
mod store;
mod subscribers;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CacheConfig;
pub use lifecycle::BuoyService;
pub use persist::{NoopPersistence, Persistence};
pub use provider::BuoyProvider;
pub use scheduler::{CHECKPOINTS, Clock, Scheduler, delay_until_next_checkpoint, wait_minutes};
pub use store::BuoyCache;
pub use subscribers::{Callback, SubscribeError, Subscribers};
