//! Provider and observer contracts, plus the per-provider observer registry.

use std::sync::Weak;

use parking_lot::RwLock;
use tracing::trace;

use crate::graph::node::GraphNode;
use crate::graph::notice::{AddedEntry, DirtiedEntry, RemovedEntry};
use crate::path::ScenePath;

/// Receives ordered, atomically delivered change batches from a provider.
///
/// One call corresponds to one batch: a provider never splits, coalesces or
/// reorders entries across calls.
pub trait GraphObserver: Send + Sync {
    fn nodes_added(&self, entries: &[AddedEntry]);
    fn nodes_removed(&self, entries: &[RemovedEntry]);
    fn nodes_dirtied(&self, entries: &[DirtiedEntry]);
}

/// Queryable, change-notifying hierarchical scene graph.
///
/// Filtering layers implement the same contract they consume, so providers
/// chain arbitrarily.
pub trait GraphProvider: Send + Sync {
    /// Look up the node at `path`. Absence is expected and silent: paths
    /// outside the provider's domain yield the absent-node sentinel.
    fn get_node(&self, path: &ScenePath) -> GraphNode;

    /// Ordered child paths of `path`; empty when there are none.
    fn child_paths(&self, path: &ScenePath) -> Vec<ScenePath>;

    /// Register a downstream observer for change batches.
    fn add_observer(&self, observer: Weak<dyn GraphObserver>);

    /// Unregister a previously registered observer.
    fn remove_observer(&self, observer: &Weak<dyn GraphObserver>);
}

/// Explicit per-provider observer registration list.
///
/// Delivery is synchronous and batch-atomic: one batch maps to one call per
/// live observer, in registration order. Observers dropped by their owners
/// are pruned lazily on the next delivery.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Weak<dyn GraphObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, observer: Weak<dyn GraphObserver>) {
        self.observers.write().push(observer);
    }

    pub fn remove(&self, observer: &Weak<dyn GraphObserver>) {
        self.observers.write().retain(|other| !other.ptr_eq(observer));
    }

    pub fn notify_added(&self, entries: &[AddedEntry]) {
        trace!(count = entries.len(), "delivering added batch");
        self.for_each_live(|observer| observer.nodes_added(entries));
    }

    pub fn notify_removed(&self, entries: &[RemovedEntry]) {
        trace!(count = entries.len(), "delivering removed batch");
        self.for_each_live(|observer| observer.nodes_removed(entries));
    }

    pub fn notify_dirtied(&self, entries: &[DirtiedEntry]) {
        trace!(count = entries.len(), "delivering dirtied batch");
        self.for_each_live(|observer| observer.nodes_dirtied(entries));
    }

    // Snapshot the list before invoking observers so an observer may register
    // or unregister during delivery without deadlocking the lock.
    fn for_each_live(&self, mut deliver: impl FnMut(&dyn GraphObserver)) {
        let snapshot: Vec<Weak<dyn GraphObserver>> = self.observers.read().clone();
        let mut dropped = false;
        for weak in &snapshot {
            match weak.upgrade() {
                Some(observer) => deliver(observer.as_ref()),
                None => dropped = true,
            }
        }
        if dropped {
            self.observers
                .write()
                .retain(|observer| observer.strong_count() > 0);
        }
    }
}
