//! Regraft: Namespace-Prefixing Scene Graph Filters
//!
//! A filtering layer for hierarchical, change-notifying scene graphs: given
//! an upstream graph provider and a path prefix, expose a virtual graph in
//! which every upstream node appears to live under that prefix, translating
//! queries and change-notification batches between the two namespaces.

pub mod error;
pub mod filter;
pub mod graph;
pub mod logging;
pub mod path;
pub mod source;
