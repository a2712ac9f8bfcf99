//! In-memory retained scene graph provider.
//!
//! The concrete graph building block: callers populate it directly and every
//! mutation is pushed to registered observers as one ordered batch. It also
//! serves as the upstream end of filter chains in tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::graph::node::GraphNode;
use crate::graph::notice::{AddedEntry, DirtiedEntry, RemovedEntry};
use crate::graph::observer::{GraphObserver, GraphProvider, ObserverRegistry};
use crate::path::ScenePath;
use crate::source::ContainerHandle;

/// One node to insert into a retained graph.
pub struct RetainedNode {
    pub path: ScenePath,
    pub node_type: String,
    pub data: Option<ContainerHandle>,
}

impl RetainedNode {
    pub fn new(
        path: ScenePath,
        node_type: impl Into<String>,
        data: Option<ContainerHandle>,
    ) -> Self {
        Self {
            path,
            node_type: node_type.into(),
            data,
        }
    }
}

#[derive(Default)]
pub struct RetainedGraphProvider {
    nodes: parking_lot::RwLock<BTreeMap<ScenePath, GraphNode>>,
    observers: ObserverRegistry,
}

impl RetainedGraphProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Insert (or overwrite) nodes, then notify observers with one added
    /// batch in the given order.
    pub fn add_nodes(&self, nodes: Vec<RetainedNode>) {
        let mut entries = Vec::with_capacity(nodes.len());
        {
            let mut map = self.nodes.write();
            for node in nodes {
                entries.push(AddedEntry::new(node.path.clone(), node.node_type.clone()));
                map.insert(node.path, GraphNode::new(node.node_type, node.data));
            }
        }
        debug!(count = entries.len(), "retained graph: nodes added");
        self.observers.notify_added(&entries);
    }

    /// Remove each path and all its descendants; one removed batch listing
    /// the given paths (descendant removal is implied).
    pub fn remove_nodes(&self, paths: Vec<ScenePath>) {
        {
            let mut map = self.nodes.write();
            for path in &paths {
                map.retain(|candidate, _| !candidate.has_prefix(path));
            }
        }
        let entries: Vec<RemovedEntry> = paths.into_iter().map(RemovedEntry::new).collect();
        debug!(count = entries.len(), "retained graph: nodes removed");
        self.observers.notify_removed(&entries);
    }

    /// Forward a dirtied batch to observers unchanged.
    pub fn dirty_nodes(&self, entries: Vec<DirtiedEntry>) {
        self.observers.notify_dirtied(&entries);
    }
}

impl GraphProvider for RetainedGraphProvider {
    fn get_node(&self, path: &ScenePath) -> GraphNode {
        self.nodes
            .read()
            .get(path)
            .cloned()
            .unwrap_or_else(GraphNode::absent)
    }

    // Implicit ancestors are traversable: the children of `path` are the
    // distinct next elements among stored paths below it, in stored order.
    fn child_paths(&self, path: &ScenePath) -> Vec<ScenePath> {
        let map = self.nodes.read();
        let mut children: Vec<ScenePath> = Vec::new();
        for candidate in map.keys() {
            if candidate.element_count() > path.element_count() && candidate.has_prefix(path) {
                let child = candidate.prefixes()[path.element_count()].clone();
                if children.last() != Some(&child) {
                    children.push(child);
                }
            }
        }
        children
    }

    fn add_observer(&self, observer: Weak<dyn GraphObserver>) {
        self.observers.add(observer);
    }

    fn remove_observer(&self, observer: &Weak<dyn GraphObserver>) {
        self.observers.remove(observer);
    }
}
