//! In-memory data sources for building retained scene graphs.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use crate::path::ScenePath;
use crate::source::{
    ContainerHandle, ContainerSource, DataSource, DataSourceHandle, PathLeafHandle,
    PathLeafSource, SampledHandle, SampledSource,
};

/// Insertion-ordered container of named child data sources.
pub struct RetainedContainer {
    entries: Vec<(String, DataSourceHandle)>,
}

impl RetainedContainer {
    pub fn new(entries: Vec<(String, DataSourceHandle)>) -> Self {
        Self { entries }
    }

    pub fn shared(entries: Vec<(String, DataSourceHandle)>) -> ContainerHandle {
        Arc::new(Self::new(entries))
    }
}

impl DataSource for RetainedContainer {
    fn as_container(self: Arc<Self>) -> Option<ContainerHandle> {
        Some(self)
    }
}

impl ContainerSource for RetainedContainer {
    fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry_name, _)| entry_name == name)
    }

    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn get(&self, name: &str) -> Option<DataSourceHandle> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, handle)| handle.clone())
    }
}

/// Time-sampled path-typed leaf.
///
/// The value at time `t` is the sample with the greatest time `<= t`, falling
/// back to the first sample for times before the range.
pub struct RetainedPathLeaf {
    samples: Vec<(f64, ScenePath)>,
}

impl RetainedPathLeaf {
    pub fn new(mut samples: Vec<(f64, ScenePath)>) -> Self {
        samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        Self { samples }
    }

    /// A leaf holding one time-independent path value.
    pub fn constant(path: ScenePath) -> Self {
        Self {
            samples: vec![(0.0, path)],
        }
    }

    pub fn shared(samples: Vec<(f64, ScenePath)>) -> PathLeafHandle {
        Arc::new(Self::new(samples))
    }

    pub fn shared_constant(path: ScenePath) -> PathLeafHandle {
        Arc::new(Self::constant(path))
    }

    fn sample_at(&self, time: f64) -> Option<&ScenePath> {
        self.samples
            .iter()
            .rev()
            .find(|(sample_time, _)| *sample_time <= time)
            .or_else(|| self.samples.first())
            .map(|(_, path)| path)
    }
}

impl DataSource for RetainedPathLeaf {
    fn as_path_leaf(self: Arc<Self>) -> Option<PathLeafHandle> {
        Some(self)
    }
}

impl PathLeafSource for RetainedPathLeaf {
    fn typed_value(&self, time: f64) -> ScenePath {
        self.sample_at(time).cloned().unwrap_or_default()
    }

    fn value(&self, time: f64) -> Value {
        Value::String(self.typed_value(time).to_string())
    }

    fn sample_times_in_interval(&self, start: f64, end: f64) -> Option<Vec<f64>> {
        sample_times(self.samples.iter().map(|(time, _)| *time), start, end)
    }
}

/// Time-sampled leaf holding opaque values.
pub struct RetainedValueLeaf {
    samples: Vec<(f64, Value)>,
}

impl RetainedValueLeaf {
    pub fn new(mut samples: Vec<(f64, Value)>) -> Self {
        samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        Self { samples }
    }

    pub fn constant(value: Value) -> Self {
        Self {
            samples: vec![(0.0, value)],
        }
    }

    pub fn shared(samples: Vec<(f64, Value)>) -> SampledHandle {
        Arc::new(Self::new(samples))
    }

    pub fn shared_constant(value: Value) -> SampledHandle {
        Arc::new(Self::constant(value))
    }
}

impl DataSource for RetainedValueLeaf {}

impl SampledSource for RetainedValueLeaf {
    fn value(&self, time: f64) -> Value {
        self.samples
            .iter()
            .rev()
            .find(|(sample_time, _)| *sample_time <= time)
            .or_else(|| self.samples.first())
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Null)
    }

    fn sample_times_in_interval(&self, start: f64, end: f64) -> Option<Vec<f64>> {
        sample_times(self.samples.iter().map(|(time, _)| *time), start, end)
    }
}

fn sample_times(times: impl Iterator<Item = f64>, start: f64, end: f64) -> Option<Vec<f64>> {
    let contributing: Vec<f64> = times.filter(|time| *time >= start && *time <= end).collect();
    if contributing.is_empty() {
        None
    } else {
        Some(contributing)
    }
}
