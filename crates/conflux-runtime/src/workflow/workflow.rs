//! Declarative workflow builder.

use std::collections::{HashMap, HashSet};

use conflux_core::types::DataType;

use super::{TRACING_TARGET, WorkflowNode};
use crate::error::{Error, Result};
use crate::graph::{CompileOptions, CompiledGraph, END, Graph, Node, NodeTriggerMode};
use crate::mapping::FieldMapping;

/// A graph declared node by node through input mappings.
///
/// Each node states where its input comes from as a list of
/// [`FieldMapping`]s; compiling the workflow turns those declarations into
/// graph edges, one per source node.
pub struct Workflow {
    graph: Graph,
    nodes: Vec<WorkflowNode>,
    node_indices: HashMap<String, usize>,
    end: WorkflowNode,
}

impl Workflow {
    /// Creates an empty workflow with the given input and output types.
    pub fn new(input_type: DataType, output_type: DataType) -> Self {
        Self {
            graph: Graph::new(input_type, output_type),
            nodes: Vec::new(),
            node_indices: HashMap::new(),
            end: WorkflowNode::new(END),
        }
    }

    /// Returns the number of declared nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Adds a node under a unique key and returns it for input declarations.
    pub fn add_node<N: Node>(&mut self, key: impl Into<String>, node: N) -> Result<&mut WorkflowNode> {
        let key = key.into();
        self.graph.add_node(key.clone(), node)?;

        let index = self.nodes.len();
        self.nodes.push(WorkflowNode::new(key.clone()));
        self.node_indices.insert(key, index);
        Ok(&mut self.nodes[index])
    }

    /// Returns a declared node by key.
    pub fn node_mut(&mut self, key: &str) -> Option<&mut WorkflowNode> {
        let index = *self.node_indices.get(key)?;
        self.nodes.get_mut(index)
    }

    /// Declares mappings feeding the workflow output.
    pub fn add_end<I>(&mut self, mappings: I) -> &mut Self
    where
        I: IntoIterator<Item = FieldMapping>,
    {
        self.end.add_input(mappings);
        self
    }

    /// Checks every node's declared inputs and compiles the workflow.
    ///
    /// Only the [`NodeTriggerMode::AllPredecessor`] trigger mode is accepted,
    /// since a node assembled from fields needs every contributing
    /// predecessor to have completed.
    pub fn compile(self, options: CompileOptions) -> Result<CompiledGraph> {
        if options.trigger_mode != NodeTriggerMode::AllPredecessor {
            return Err(Error::Structural(format!(
                "workflow does not support the {} trigger mode",
                options.trigger_mode
            )));
        }

        let Self {
            mut graph,
            nodes,
            end,
            ..
        } = self;

        for node in nodes.iter().chain([&end]) {
            check_inputs(node)?;
        }

        let mut edges = 0;
        for node in nodes.iter().chain([&end]) {
            edges += emit_edges(&mut graph, node)?;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            nodes = nodes.len(),
            edges,
            "workflow edges emitted",
        );

        graph.compile(options)
    }
}

fn label(key: &str) -> String {
    if key == END {
        "workflow END".to_owned()
    } else {
        format!("workflow node '{}'", key)
    }
}

/// Rejects input declarations that cannot describe a single input value.
fn check_inputs(node: &WorkflowNode) -> Result<()> {
    let inputs = node.inputs();
    if inputs.is_empty() {
        return Err(Error::Structural(format!(
            "{} has no input mapping",
            label(node.key())
        )));
    }

    let mut targets = HashSet::with_capacity(inputs.len());
    for mapping in inputs {
        if mapping.is_to_all() && inputs.len() > 1 {
            return Err(Error::Structural(format!(
                "{} maps {} to its whole input, but has other input mappings",
                label(node.key()),
                mapping
            )));
        }
        if !targets.insert(mapping.target()) {
            return Err(Error::Structural(format!(
                "{} has more than one mapping to field '{}'",
                label(node.key()),
                mapping.target()
            )));
        }
    }

    Ok(())
}

/// Adds one edge per source node to the graph and returns how many were added.
fn emit_edges(graph: &mut Graph, node: &WorkflowNode) -> Result<usize> {
    let mut groups: Vec<(&str, Vec<FieldMapping>)> = Vec::new();
    for mapping in node.inputs() {
        match groups.iter_mut().find(|(from, _)| *from == mapping.from_node()) {
            Some((_, group)) => group.push(mapping.clone()),
            None => groups.push((mapping.from_node(), vec![mapping.clone()])),
        }
    }

    let count = groups.len();
    for (from, group) in groups {
        if group.len() == 1 && group[0].is_empty() {
            tracing::trace!(target: TRACING_TARGET, from, to = node.key(), "plain edge");
            graph.add_edge(from, node.key())?;
        } else {
            tracing::trace!(
                target: TRACING_TARGET,
                from,
                to = node.key(),
                mappings = group.len(),
                "field mapping edge",
            );
            graph.add_edge_with_mappings(from, node.key(), group)?;
        }
    }

    Ok(count)
}
