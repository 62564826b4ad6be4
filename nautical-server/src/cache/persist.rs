//! Insertion hooks for writing cache contents to a backing store.
//!
//! Nothing is persisted by default. The cache calls these hooks as data
//! arrives so a storage backend can be attached without touching the
//! refresh logic.

use crate::domain::{BuoySnapshot, Source};

/// Receives data as the cache takes it in.
///
/// Hooks run inline on the refresh or lookup path and must not block.
pub trait Persistence: Send + Sync {
    /// Called once per kept source on every successful refresh.
    fn insert_source(&self, _source: &Source) {}

    /// Called for every observation resolved from the provider.
    fn insert_station(&self, _snapshot: &BuoySnapshot) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl Persistence for NoopPersistence {}
