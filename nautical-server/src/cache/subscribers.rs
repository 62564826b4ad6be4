//! Callbacks run after every completed refresh cycle.

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// A refresh listener. Takes no arguments; it reads whatever it needs
/// from the cache itself.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Errors from registering a subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscribeError {
    /// Another live subscription already uses this id
    #[error("subscription {0} already exists")]
    Duplicate(String),

    /// Subscription ids must be non-empty
    #[error("subscription id must not be empty")]
    EmptyId,
}

/// Registry of refresh listeners keyed by subscription id.
#[derive(Default)]
pub struct Subscribers {
    callbacks: Mutex<HashMap<String, Callback>>,
}

impl Subscribers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback under a freshly generated UUIDv4 id.
    pub fn subscribe<F>(&self, callback: F) -> Result<String, SubscribeError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe_with_id(Uuid::new_v4().to_string(), callback)
    }

    /// Register a callback under a caller-chosen id.
    ///
    /// Fails without touching the existing entry if the id is taken.
    pub fn subscribe_with_id<F>(
        &self,
        id: impl Into<String>,
        callback: F,
    ) -> Result<String, SubscribeError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(SubscribeError::EmptyId);
        }

        let mut callbacks = self.callbacks.lock();
        if callbacks.contains_key(&id) {
            return Err(SubscribeError::Duplicate(id));
        }
        callbacks.insert(id.clone(), Arc::new(callback));
        debug!(subscription = %id, "subscribed");

        Ok(id)
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: &str) -> bool {
        let removed = self.callbacks.lock().remove(id).is_some();
        if removed {
            debug!(subscription = %id, "unsubscribed");
        }
        removed
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every callback once, in no particular order.
    ///
    /// The table lock is released before any callback runs, so callbacks
    /// may subscribe or unsubscribe. A panicking callback is logged and
    /// the rest still run. Returns how many callbacks completed.
    pub fn notify_all(&self) -> usize {
        let snapshot: Vec<(String, Callback)> = self
            .callbacks
            .lock()
            .iter()
            .map(|(id, cb)| (id.clone(), Arc::clone(cb)))
            .collect();

        let mut completed = 0;
        for (id, callback) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback())) {
                Ok(()) => completed += 1,
                Err(_) => warn!(subscription = %id, "subscriber callback panicked"),
            }
        }
        completed
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}
