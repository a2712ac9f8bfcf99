//! Scene Graph Provider Contract
//!
//! The provider/observer contract: queryable hierarchical node graphs that
//! push ordered batches of change notifications to registered observers.

pub mod node;
pub mod notice;
pub mod observer;
pub mod retained;
