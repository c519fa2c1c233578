//! Compiled graph types for execution.
//!
//! These types are created by [`Graph::compile`](crate::graph::Graph::compile).
//! Every edge carries its mappings and the guards validation produced, and
//! every node carries the converter that assembles its input, so execution
//! never re-derives anything from declared types.

mod edge;
mod graph;
mod node;

pub use edge::CompiledEdge;
pub use graph::CompiledGraph;
pub use node::CompiledNode;
