//! Change notification entries and dirty locators.
//!
//! Entries are grouped into ordered batches; order within a batch is
//! semantically significant and must be preserved end-to-end by every layer.

use serde::{Deserialize, Serialize};

use crate::path::ScenePath;

/// Ordered token path addressing a nested data source within a node's
/// container hierarchy. Opaque to filtering layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(Vec<String>);

impl Locator {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

/// Insertion-ordered, deduplicated set of locators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorSet(Vec<Locator>);

impl LocatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: Locator) {
        if !self.0.contains(&locator) {
            self.0.push(locator);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Locator> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Locator> for LocatorSet {
    fn from_iter<T: IntoIterator<Item = Locator>>(iter: T) -> Self {
        let mut set = Self::new();
        for locator in iter {
            set.insert(locator);
        }
        set
    }
}

/// A node added to (or re-typed in) the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEntry {
    pub path: ScenePath,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl AddedEntry {
    pub fn new(path: ScenePath, node_type: impl Into<String>) -> Self {
        Self {
            path,
            node_type: node_type.into(),
        }
    }
}

/// A node (and implicitly its descendants) removed from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEntry {
    pub path: ScenePath,
}

impl RemovedEntry {
    pub fn new(path: ScenePath) -> Self {
        Self { path }
    }
}

/// A node whose data at the given locators changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtiedEntry {
    pub path: ScenePath,
    pub locators: LocatorSet,
}

impl DirtiedEntry {
    pub fn new(path: ScenePath, locators: LocatorSet) -> Self {
        Self { path, locators }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_added_entry_round_trip() {
        let entry = AddedEntry::new(p("/world/cube"), "mesh");
        let serialized = serde_json::to_string(&entry).unwrap();
        assert_eq!(serialized, r#"{"path":"/world/cube","type":"mesh"}"#);
        let parsed: AddedEntry = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_dirtied_entry_round_trip() {
        let locators: LocatorSet = [Locator::new(["xform", "matrix"])].into_iter().collect();
        let entry = DirtiedEntry::new(p("/world/cube"), locators);
        let serialized = serde_json::to_string(&entry).unwrap();
        let parsed: DirtiedEntry = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_locator_set_dedupes_preserving_order() {
        let mut set = LocatorSet::new();
        set.insert(Locator::new(["b"]));
        set.insert(Locator::new(["a"]));
        set.insert(Locator::new(["b"]));
        let tokens: Vec<&str> = set.iter().map(|l| l.tokens()[0].as_str()).collect();
        assert_eq!(tokens, vec!["b", "a"]);
    }
}
