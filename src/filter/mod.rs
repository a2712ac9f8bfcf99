//! Filtering providers layered over an upstream scene graph.

pub mod prefixing;
