//! Prefixing filter: re-roots an upstream scene graph under a fixed path
//! prefix.
//!
//! Every upstream node appears to live under the prefix; queries are
//! translated into the upstream namespace on the way in, and change batches
//! are translated into the virtual namespace on the way out. The filter
//! implements the same provider/observer contract it consumes, so multiple
//! prefixing layers chain arbitrarily. One prefix per instance; compose via
//! chaining for multiple.

use std::sync::{Arc, Weak};

use serde_json::Value;

use crate::graph::node::GraphNode;
use crate::graph::notice::{AddedEntry, DirtiedEntry, RemovedEntry};
use crate::graph::observer::{GraphObserver, GraphProvider, ObserverRegistry};
use crate::path::ScenePath;
use crate::source::{
    ContainerHandle, ContainerSource, DataSource, DataSourceHandle, PathLeafHandle,
    PathLeafSource,
};

/// Path-typed leaf proxy: rewrites absolute path values into the virtual
/// namespace on read. Relative values are not root-anchored and pass through
/// unchanged.
pub struct PrefixingPathLeaf {
    prefix: ScenePath,
    inner: Option<PathLeafHandle>,
}

impl PrefixingPathLeaf {
    pub fn new(prefix: ScenePath, inner: Option<PathLeafHandle>) -> Self {
        Self { prefix, inner }
    }

    pub fn shared(prefix: ScenePath, inner: Option<PathLeafHandle>) -> PathLeafHandle {
        Arc::new(Self::new(prefix, inner))
    }
}

impl DataSource for PrefixingPathLeaf {
    fn as_path_leaf(self: Arc<Self>) -> Option<PathLeafHandle> {
        Some(self)
    }
}

impl PathLeafSource for PrefixingPathLeaf {
    fn typed_value(&self, time: f64) -> ScenePath {
        let Some(inner) = &self.inner else {
            return ScenePath::default();
        };

        let result = inner.typed_value(time);
        if result.is_absolute() {
            return result.replace_prefix(&ScenePath::root(), &self.prefix);
        }
        result
    }

    fn value(&self, time: f64) -> Value {
        Value::String(self.typed_value(time).to_string())
    }

    fn sample_times_in_interval(&self, start: f64, end: f64) -> Option<Vec<f64>> {
        self.inner.as_ref()?.sample_times_in_interval(start, end)
    }
}

/// Container proxy: delegates membership and enumeration verbatim and wraps
/// children on demand.
pub struct PrefixingContainer {
    prefix: ScenePath,
    inner: Option<ContainerHandle>,
}

impl PrefixingContainer {
    pub fn new(prefix: ScenePath, inner: Option<ContainerHandle>) -> Self {
        Self { prefix, inner }
    }

    pub fn shared(prefix: ScenePath, inner: Option<ContainerHandle>) -> ContainerHandle {
        Arc::new(Self::new(prefix, inner))
    }
}

impl DataSource for PrefixingContainer {
    fn as_container(self: Arc<Self>) -> Option<ContainerHandle> {
        Some(self)
    }
}

impl ContainerSource for PrefixingContainer {
    fn has(&self, name: &str) -> bool {
        self.inner.as_ref().map(|inner| inner.has(name)).unwrap_or(false)
    }

    fn names(&self) -> Vec<String> {
        self.inner.as_ref().map(|inner| inner.names()).unwrap_or_default()
    }

    // Wrap child containers so that their own children get wrapped in turn,
    // and path-typed leaves so their values get rewritten. Wrapping happens
    // only for the child actually fetched here, never eagerly for siblings.
    // Anything else is namespace-independent and passes through untouched.
    fn get(&self, name: &str) -> Option<DataSourceHandle> {
        let child = self.inner.as_ref()?.get(name)?;

        if let Some(container) = child.clone().as_container() {
            return Some(Arc::new(PrefixingContainer::new(
                self.prefix.clone(),
                Some(container),
            )));
        }

        if let Some(leaf) = child.clone().as_path_leaf() {
            return Some(Arc::new(PrefixingPathLeaf::new(
                self.prefix.clone(),
                Some(leaf),
            )));
        }

        Some(child)
    }
}

/// Filtering provider exposing an upstream graph re-rooted under `prefix`.
///
/// The virtual namespace contains exactly the upstream paths with the prefix
/// prepended, plus the synthetic junction paths (strict ancestors of the
/// prefix) that keep a top-down walk from the true root able to reach the
/// subtree. Junctions resolve to the absent-node sentinel.
///
/// Upstream handle and prefix are fixed at construction; the instance holds
/// no other state, so concurrent queries need no external synchronization.
pub struct PrefixingProvider {
    upstream: Arc<dyn GraphProvider>,
    prefix: ScenePath,
    observers: ObserverRegistry,
}

impl PrefixingProvider {
    /// Build the filter and subscribe it to upstream change batches.
    pub fn new(upstream: Arc<dyn GraphProvider>, prefix: ScenePath) -> Arc<Self> {
        let provider = Arc::new(Self {
            upstream: upstream.clone(),
            prefix,
            observers: ObserverRegistry::new(),
        });
        let weak: Weak<dyn GraphObserver> =
            Arc::downgrade(&(provider.clone() as Arc<dyn GraphObserver>));
        upstream.add_observer(weak);
        provider
    }

    pub fn prefix(&self) -> &ScenePath {
        &self.prefix
    }

    fn add_prefix(&self, path: &ScenePath) -> ScenePath {
        path.replace_prefix(&ScenePath::root(), &self.prefix)
    }

    fn remove_prefix(&self, path: &ScenePath) -> ScenePath {
        path.replace_prefix(&self.prefix, &ScenePath::root())
    }
}

impl GraphProvider for PrefixingProvider {
    fn get_node(&self, path: &ScenePath) -> GraphNode {
        if !path.has_prefix(&self.prefix) {
            return GraphNode::absent();
        }

        let mut node = self.upstream.get_node(&self.remove_prefix(path));
        if let Some(data) = node.data.take() {
            node.data = Some(PrefixingContainer::shared(self.prefix.clone(), Some(data)));
        }
        node
    }

    fn child_paths(&self, path: &ScenePath) -> Vec<ScenePath> {
        // Below the prefix (or at it): strip the prefix and let upstream
        // answer, then re-root each child, preserving upstream order.
        if path.has_prefix(&self.prefix) {
            return self
                .upstream
                .child_paths(&self.remove_prefix(path))
                .iter()
                .map(|child| self.prefix.append(&child.make_relative(&ScenePath::root())))
                .collect();
        }

        // Strict ancestor of the prefix: synthesize the one junction child on
        // the unique chain toward the prefix. With prefix /A/B/C/D, a query
        // for /A/B yields [/A/B/C].
        if self.prefix.has_prefix(path) {
            return vec![self.prefix.prefixes()[path.element_count()].clone()];
        }

        // Disjoint from both the subtree and its ancestor chain.
        Vec::new()
    }

    fn add_observer(&self, observer: Weak<dyn GraphObserver>) {
        self.observers.add(observer);
    }

    fn remove_observer(&self, observer: &Weak<dyn GraphObserver>) {
        self.observers.remove(observer);
    }
}

impl GraphObserver for PrefixingProvider {
    fn nodes_added(&self, entries: &[AddedEntry]) {
        let prefixed: Vec<AddedEntry> = entries
            .iter()
            .map(|entry| AddedEntry::new(self.add_prefix(&entry.path), entry.node_type.clone()))
            .collect();
        self.observers.notify_added(&prefixed);
    }

    fn nodes_removed(&self, entries: &[RemovedEntry]) {
        let prefixed: Vec<RemovedEntry> = entries
            .iter()
            .map(|entry| RemovedEntry::new(self.add_prefix(&entry.path)))
            .collect();
        self.observers.notify_removed(&prefixed);
    }

    fn nodes_dirtied(&self, entries: &[DirtiedEntry]) {
        let prefixed: Vec<DirtiedEntry> = entries
            .iter()
            .map(|entry| DirtiedEntry::new(self.add_prefix(&entry.path), entry.locators.clone()))
            .collect();
        self.observers.notify_dirtied(&prefixed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::retained::{RetainedContainer, RetainedPathLeaf, RetainedValueLeaf};

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_leaf_rewrites_absolute_values() {
        let inner = RetainedPathLeaf::shared_constant(p("/Foo/Bar"));
        let leaf = PrefixingPathLeaf::new(p("/A/B/C/D"), Some(inner));
        assert_eq!(leaf.typed_value(0.0), p("/A/B/C/D/Foo/Bar"));
        assert_eq!(leaf.value(0.0), Value::String("/A/B/C/D/Foo/Bar".to_string()));
    }

    #[test]
    fn test_leaf_passes_relative_values_through() {
        let inner = RetainedPathLeaf::shared_constant(p("Foo/Bar"));
        let leaf = PrefixingPathLeaf::new(p("/A/B/C/D"), Some(inner));
        assert_eq!(leaf.typed_value(0.0), p("Foo/Bar"));
    }

    #[test]
    fn test_leaf_without_inner_degrades() {
        let leaf = PrefixingPathLeaf::new(p("/A"), None);
        assert!(leaf.typed_value(0.0).is_empty());
        assert_eq!(leaf.sample_times_in_interval(0.0, 1.0), None);
    }

    #[test]
    fn test_leaf_delegates_sample_times() {
        let inner = RetainedPathLeaf::shared(vec![(0.0, p("/x")), (1.0, p("/y"))]);
        let leaf = PrefixingPathLeaf::new(p("/A"), Some(inner));
        assert_eq!(leaf.sample_times_in_interval(0.0, 2.0), Some(vec![0.0, 1.0]));
    }

    #[test]
    fn test_container_delegates_membership_and_names() {
        let inner = RetainedContainer::shared(vec![
            ("first".to_string(), Arc::new(RetainedValueLeaf::constant(Value::from(1))) as DataSourceHandle),
            ("second".to_string(), Arc::new(RetainedValueLeaf::constant(Value::from(2))) as DataSourceHandle),
        ]);
        let wrapped = PrefixingContainer::new(p("/A"), Some(inner));
        assert!(wrapped.has("first"));
        assert!(!wrapped.has("third"));
        assert_eq!(wrapped.names(), vec!["first", "second"]);
    }

    #[test]
    fn test_container_without_inner_degrades() {
        let wrapped = PrefixingContainer::new(p("/A"), None);
        assert!(!wrapped.has("anything"));
        assert!(wrapped.names().is_empty());
        assert!(wrapped.get("anything").is_none());
    }

    #[test]
    fn test_opaque_children_pass_through_untouched() {
        let opaque: DataSourceHandle = Arc::new(RetainedValueLeaf::constant(Value::from("blob")));
        let inner = RetainedContainer::shared(vec![("blob".to_string(), opaque.clone())]);
        let wrapped = PrefixingContainer::new(p("/A"), Some(inner));
        let fetched = wrapped.get("blob").unwrap();
        assert!(Arc::ptr_eq(&fetched, &opaque));
    }

    #[test]
    fn test_nested_containers_wrap_recursively() {
        let nested: DataSourceHandle = Arc::new(RetainedContainer::new(vec![(
            "rel".to_string(),
            Arc::new(RetainedPathLeaf::constant(p("/Target"))) as DataSourceHandle,
        )]));
        let inner = RetainedContainer::shared(vec![("child".to_string(), nested)]);
        let wrapped = PrefixingContainer::new(p("/A/B"), Some(inner));

        let child = wrapped.get("child").unwrap().as_container().unwrap();
        let leaf = child.get("rel").unwrap().as_path_leaf().unwrap();
        assert_eq!(leaf.typed_value(0.0), p("/A/B/Target"));
    }
}
