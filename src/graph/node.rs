//! Scene graph node domain type.

use std::fmt;

use crate::source::ContainerHandle;

/// A scene graph node: a type tag plus optional content container.
///
/// The pair (empty type, no data) is the canonical "no node here" sentinel;
/// lookups outside a provider's domain return it rather than an error.
#[derive(Clone, Default)]
pub struct GraphNode {
    pub node_type: String,
    pub data: Option<ContainerHandle>,
}

impl GraphNode {
    pub fn new(node_type: impl Into<String>, data: Option<ContainerHandle>) -> Self {
        Self {
            node_type: node_type.into(),
            data,
        }
    }

    /// The absent-node sentinel.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.node_type.is_empty() && self.data.is_none()
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("node_type", &self.node_type)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_sentinel() {
        let node = GraphNode::absent();
        assert!(node.is_absent());
        assert!(node.node_type.is_empty());
        assert!(node.data.is_none());
    }

    #[test]
    fn test_typed_node_is_present() {
        let node = GraphNode::new("mesh", None);
        assert!(!node.is_absent());
    }
}
