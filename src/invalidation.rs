//! Invalidation notifications.
//!
//! Services holding derived caches register a listener; whoever detects an
//! upstream change (configuration reload, hot-swapped catalog) fires the hub.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Receives "cached state is stale" notifications.
pub trait InvalidationListener: Send + Sync {
    fn object_was_invalidated(&self);
}

/// Explicit subscription list of invalidation listeners.
#[derive(Default)]
pub struct InvalidationEventHub {
    listeners: RwLock<Vec<Arc<dyn InvalidationListener>>>,
}

impl InvalidationEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn InvalidationListener>) {
        self.listeners.write().push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Notify every listener in registration order.
    pub fn fire_invalidation_event(&self) {
        // Snapshot so a listener may register another listener without deadlocking.
        let listeners: Vec<_> = self.listeners.read().clone();
        debug!(listeners = listeners.len(), "Firing invalidation event");
        for listener in listeners {
            listener.object_was_invalidated();
        }
    }
}
