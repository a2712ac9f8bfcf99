//! Data source abstractions for scene graph node contents.
//!
//! Node data is a tree of polymorphic sources: containers bear named
//! children, leaves bear time-sampled values. Capability queries replace a
//! closed type switch, so value kinds this crate does not know about fall
//! through the `None` defaults and pass through filtering layers untouched.

pub mod retained;

use std::sync::Arc;

use serde_json::Value;

use crate::path::ScenePath;

pub type DataSourceHandle = Arc<dyn DataSource>;
pub type ContainerHandle = Arc<dyn ContainerSource>;
pub type PathLeafHandle = Arc<dyn PathLeafSource>;
pub type SampledHandle = Arc<dyn SampledSource>;

/// Base capability interface for polymorphic node data.
pub trait DataSource: Send + Sync + 'static {
    /// Safe downcast to a container, if this source is one.
    fn as_container(self: Arc<Self>) -> Option<ContainerHandle> {
        None
    }

    /// Safe downcast to a path-typed leaf, if this source is one.
    fn as_path_leaf(self: Arc<Self>) -> Option<PathLeafHandle> {
        None
    }
}

/// Hierarchical, named-child-bearing data source.
///
/// `names()` order is significant and must be preserved by any layer that
/// delegates to a wrapped container.
pub trait ContainerSource: DataSource {
    fn has(&self, name: &str) -> bool;
    fn names(&self) -> Vec<String>;
    fn get(&self, name: &str) -> Option<DataSourceHandle>;
}

/// Generic time-sampled data source carrying opaque values.
pub trait SampledSource: DataSource {
    fn value(&self, time: f64) -> Value;

    /// Sample times contributing to `[start, end]`, ascending. `None` means
    /// no samples contribute.
    fn sample_times_in_interval(&self, start: f64, end: f64) -> Option<Vec<f64>>;
}

/// Time-sampled data source specialized to path-typed values.
pub trait PathLeafSource: DataSource {
    fn typed_value(&self, time: f64) -> ScenePath;

    /// The typed value in the generic value envelope; always consistent with
    /// `typed_value`.
    fn value(&self, time: f64) -> Value;

    fn sample_times_in_interval(&self, start: f64, end: f64) -> Option<Vec<f64>>;
}
