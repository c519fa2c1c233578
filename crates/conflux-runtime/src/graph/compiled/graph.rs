//! Compiled graph and its executor.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use conflux_core::types::DataType;
use conflux_core::value::Value;
use futures::StreamExt;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;

use super::{CompiledEdge, CompiledNode};
use crate::error::{Error, Result};
use crate::graph::{CompileOptions, END, NodeTriggerMode, START, TRACING_TARGET};
use crate::mapping::{GuardPlan, TypeGuard, gather};
use crate::stream::{ValueStream, convert_stream, fan_out};

/// A compiled graph ready for execution.
///
/// Nodes run in topological order. Each node's input is assembled from the
/// contributions of its incoming edges: with
/// [`NodeTriggerMode::AllPredecessor`] every edge contributes, with
/// [`NodeTriggerMode::AnyPredecessor`] only the edge from the predecessor
/// that completed first. A compiled graph holds no per-run state and can
/// serve concurrent executions.
pub struct CompiledGraph {
    /// The underlying directed graph.
    graph: DiGraph<CompiledNode, CompiledEdge>,
    /// Map from node keys to graph indices.
    node_indices: HashMap<String, NodeIndex>,
    /// Execution order, sources first.
    order: Vec<NodeIndex>,
    /// Position of each node in the execution order, by node index.
    position: Vec<usize>,
    start: NodeIndex,
    end: NodeIndex,
    input_type: DataType,
    output_type: DataType,
    options: CompileOptions,
}

impl CompiledGraph {
    pub(crate) fn new(
        graph: DiGraph<CompiledNode, CompiledEdge>,
        order: Vec<NodeIndex>,
        input_type: DataType,
        output_type: DataType,
        options: CompileOptions,
    ) -> Self {
        let node_indices: HashMap<String, NodeIndex> = graph
            .node_indices()
            .map(|index| (graph[index].key().to_owned(), index))
            .collect();

        let mut position = vec![0; graph.node_count()];
        for (pos, index) in order.iter().enumerate() {
            position[index.index()] = pos;
        }

        let start = node_indices.get(START).copied().unwrap_or_default();
        let end = node_indices.get(END).copied().unwrap_or_default();

        Self {
            graph,
            node_indices,
            order,
            position,
            start,
            end,
            input_type,
            output_type,
            options,
        }
    }

    /// Returns the declared type of the graph input.
    pub fn input_type(&self) -> &DataType {
        &self.input_type
    }

    /// Returns the declared type of the graph output.
    pub fn output_type(&self) -> &DataType {
        &self.output_type
    }

    /// Returns the options the graph was compiled with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Returns the number of nodes, including the start and end nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns a node by key.
    pub fn node(&self, key: &str) -> Option<&CompiledNode> {
        self.node_indices.get(key).map(|&index| &self.graph[index])
    }

    /// Returns the edge between two nodes, if any.
    pub fn edge(&self, from: &str, to: &str) -> Option<&CompiledEdge> {
        let from = self.node_indices.get(from)?;
        let to = self.node_indices.get(to)?;
        self.graph
            .find_edge(*from, *to)
            .map(|edge| &self.graph[edge])
    }

    /// Returns the runtime guards of the edge between two nodes, if any.
    pub fn edge_plan(&self, from: &str, to: &str) -> Option<&GuardPlan> {
        self.edge(from, to).and_then(CompiledEdge::plan)
    }

    /// Returns node keys in execution order.
    pub fn execution_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&index| self.graph[index].key())
    }

    fn input_guard(&self) -> TypeGuard {
        TypeGuard::new("graph input", "", self.input_type.clone())
    }

    fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or_default()
    }

    /// Returns the incoming edges that feed a node, in declaration order.
    fn feeding_edges(&self, index: NodeIndex) -> Vec<EdgeReference<'_, CompiledEdge>> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .collect();
        edges.sort_by_key(|edge| edge.id());

        match self.options.trigger_mode {
            NodeTriggerMode::AllPredecessor => edges,
            NodeTriggerMode::AnyPredecessor => edges
                .into_iter()
                .min_by_key(|edge| self.position[edge.source().index()])
                .into_iter()
                .collect(),
        }
    }

    fn outgoing_edges(&self, index: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| edge.id())
            .collect();
        edges.sort();
        edges
    }

    /// Runs the graph on one materialized input.
    pub async fn invoke(&self, input: Value) -> Result<Value> {
        let input = self.input_guard().check(input)?;

        tracing::debug!(
            target: TRACING_TARGET,
            name = self.name(),
            nodes = self.order.len(),
            "invoking graph",
        );

        let mut outputs: HashMap<NodeIndex, Value> = HashMap::with_capacity(self.order.len());
        outputs.insert(self.start, input);

        for &index in &self.order {
            if index == self.start {
                continue;
            }

            let node = &self.graph[index];
            let mut contributions = Vec::new();
            for edge in self.feeding_edges(index) {
                let output = outputs.get(&edge.source()).ok_or_else(|| {
                    Error::Internal(format!(
                        "predecessor of node '{}' has not produced an output",
                        node.key()
                    ))
                })?;
                contributions.push(edge.weight().apply(output)?);
            }

            let node_input = node.converter().convert(gather(contributions))?;
            let output = match node.runnable() {
                Some(runnable) => {
                    tracing::trace!(target: TRACING_TARGET, node = node.key(), "invoking node");
                    runnable.invoke(node_input).await.inspect_err(|err| {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            node = node.key(),
                            error = %err,
                            "node failed",
                        );
                    })?
                }
                None => node_input,
            };
            outputs.insert(index, output);
        }

        outputs
            .remove(&self.end)
            .ok_or_else(|| Error::Internal("graph finished without reaching END".into()))
    }

    /// Runs the graph on a stream of inputs.
    ///
    /// Every node consumes a stream assembled chunk by chunk from its feeding
    /// edges; a chunk from any edge becomes one input value holding only the
    /// fields that edge contributes. Nothing is pulled from `input` before
    /// the returned stream is polled, and an output feeding several edges is
    /// pulled only when one of its consumers asks for a chunk.
    pub async fn transform(&self, input: ValueStream) -> Result<ValueStream> {
        let guard = self.input_guard();
        let input = convert_stream(input, move |value| guard.check(value));

        tracing::debug!(
            target: TRACING_TARGET,
            name = self.name(),
            nodes = self.order.len(),
            "transforming graph",
        );

        let mut pending: HashMap<EdgeIndex, ValueStream> = HashMap::new();
        self.distribute(self.start, input, &mut pending);

        for &index in &self.order {
            if index == self.start {
                continue;
            }

            let node = &self.graph[index];
            let mut contributions = Vec::new();
            for edge in self.feeding_edges(index) {
                let upstream = pending.remove(&edge.id()).ok_or_else(|| {
                    Error::Internal(format!(
                        "predecessor of node '{}' has not produced a stream",
                        node.key()
                    ))
                })?;
                contributions.push(edge.weight().transform(upstream));
            }

            // Streams of predecessors that were not selected are dropped here.
            for edge in self.graph.edges_directed(index, Direction::Incoming) {
                pending.remove(&edge.id());
            }

            let merged = match contributions.len() {
                1 => contributions.remove(0),
                _ => futures::stream::select_all(contributions).boxed(),
            };

            let node_input = node.converter().convert_stream(merged);
            let output = match node.runnable() {
                Some(runnable) => Arc::clone(runnable).transform(node_input),
                None => node_input,
            };

            if index == self.end {
                return Ok(output);
            }
            self.distribute(index, output, &mut pending);
        }

        Err(Error::Internal("graph finished without reaching END".into()))
    }

    /// Hands a node's output stream to each of its outgoing edges.
    fn distribute(
        &self,
        index: NodeIndex,
        output: ValueStream,
        pending: &mut HashMap<EdgeIndex, ValueStream>,
    ) {
        let edges = self.outgoing_edges(index);
        let copies = fan_out(output, edges.len());
        pending.extend(edges.into_iter().zip(copies));
    }
}

impl fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("name", &self.options.name)
            .field("order", &self.execution_order().collect::<Vec<_>>())
            .field("edges", &self.graph.edge_count())
            .field("input_type", &self.input_type)
            .field("output_type", &self.output_type)
            .finish_non_exhaustive()
    }
}
