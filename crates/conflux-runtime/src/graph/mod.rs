//! Graph construction, compilation, and execution.
//!
//! A [`Graph`] is built from keyed [`Node`]s connected by [`Edge`]s between
//! the virtual [`START`] and [`END`] nodes. Compiling it checks structure and
//! declared types once, producing a [`CompiledGraph`] that runs on either a
//! single value or a stream of values.

mod compiled;
mod edge;
#[allow(clippy::module_inception)]
mod graph;
mod lambda;
mod node;
mod options;

pub use compiled::{CompiledEdge, CompiledGraph, CompiledNode};
pub use edge::Edge;
pub use graph::Graph;
pub use lambda::Lambda;
pub use node::Node;
pub use options::{CompileOptions, CompileOptionsBuilder, NodeTriggerMode};

/// Key of the virtual node whose output is the graph input.
pub const START: &str = "start";

/// Key of the virtual node whose input is the graph output.
pub const END: &str = "end";

/// Tracing target for graph operations.
pub const TRACING_TARGET: &str = "conflux_runtime::graph";
