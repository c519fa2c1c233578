//! Declarative workflows.
//!
//! A [`Workflow`] is declared node by node: each node lists the
//! [`FieldMapping`](crate::mapping::FieldMapping)s that feed it, and the
//! workflow output is declared the same way through [`Workflow::add_end`].
//! Compiling checks that every declaration describes one well-formed input,
//! groups mappings by source node into graph edges, and compiles the
//! resulting graph.

mod node;
#[allow(clippy::module_inception)]
mod workflow;

pub use node::WorkflowNode;
pub use workflow::Workflow;

/// Tracing target for workflow operations.
pub const TRACING_TARGET: &str = "conflux_runtime::workflow";
