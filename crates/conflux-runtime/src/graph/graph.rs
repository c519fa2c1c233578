//! Graph construction and compilation.

use std::collections::HashMap;
use std::sync::Arc;

use conflux_core::types::DataType;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::compiled::{CompiledEdge, CompiledGraph, CompiledNode};
use super::{CompileOptions, END, Edge, Node, NodeTriggerMode, START, TRACING_TARGET};
use crate::error::{Error, Result};
use crate::mapping::{FieldMapping, GuardPlan, ValueConverter, validate_edge, validate_field_mapping};

/// What occupies a position in the graph.
enum Slot {
    /// Virtual entry; its output is the graph input.
    Start,
    /// Virtual exit; its input is the graph output.
    End,
    /// A user node.
    Node(Arc<dyn Node>),
}

/// A keyed graph position.
struct GraphNode {
    key: String,
    slot: Slot,
}

/// A directed acyclic graph of nodes under construction.
///
/// Every graph has a virtual [`START`] node producing the graph input and a
/// virtual [`END`] node receiving the graph output. Internally uses
/// petgraph's `DiGraph`.
pub struct Graph {
    /// The underlying directed graph.
    graph: DiGraph<GraphNode, Edge>,
    /// Mapping from node keys to graph indices.
    node_indices: HashMap<String, NodeIndex>,
    /// Declared type of the graph input.
    input_type: DataType,
    /// Declared type of the graph output.
    output_type: DataType,
}

impl Graph {
    /// Creates an empty graph with the given input and output types.
    pub fn new(input_type: DataType, output_type: DataType) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        for (key, slot) in [(START, Slot::Start), (END, Slot::End)] {
            let index = graph.add_node(GraphNode {
                key: key.to_owned(),
                slot,
            });
            node_indices.insert(key.to_owned(), index);
        }

        Self {
            graph,
            node_indices,
            input_type,
            output_type,
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

    /// Returns the number of user nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count() - 2
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns whether a node with this key exists, including [`START`] and [`END`].
    pub fn contains_node(&self, key: &str) -> bool {
        self.node_indices.contains_key(key)
    }

    /// Returns an iterator over all edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Adds a node under a unique key.
    pub fn add_node<N: Node>(&mut self, key: impl Into<String>, node: N) -> Result<()> {
        self.add_shared_node(key, Arc::new(node))
    }

    /// Adds a shared node under a unique key.
    pub fn add_shared_node(&mut self, key: impl Into<String>, node: Arc<dyn Node>) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::Structural("node key must not be empty".into()));
        }
        if self.node_indices.contains_key(&key) {
            return Err(Error::Structural(format!("node '{}' already exists", key)));
        }

        let index = self.graph.add_node(GraphNode {
            key: key.clone(),
            slot: Slot::Node(node),
        });
        self.node_indices.insert(key, index);
        Ok(())
    }

    /// Adds a plain edge passing the whole output of `from` to `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        self.insert_edge(Edge::new(from, to))
    }

    /// Adds an edge routing individual fields from `from` to `to`.
    ///
    /// The mappings are validated against the declared node types when the
    /// graph is compiled.
    pub fn add_edge_with_mappings<I>(&mut self, from: &str, to: &str, mappings: I) -> Result<()>
    where
        I: IntoIterator<Item = FieldMapping>,
    {
        let edge = Edge::with_mappings(from, to, mappings);
        if edge.is_plain() {
            return Err(Error::Structural(format!(
                "edge '{}' -> '{}' declares no mappings",
                from, to
            )));
        }

        let mut targets: Vec<&str> = edge.targets().collect();
        targets.sort_unstable();
        if let Some(pair) = targets.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::Structural(format!(
                "edge '{}' -> '{}' maps to field '{}' more than once",
                from, to, pair[0]
            )));
        }

        self.insert_edge(edge)
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        if edge.from == END {
            return Err(Error::Structural("END cannot have outgoing edges".into()));
        }
        if edge.to == START {
            return Err(Error::Structural("START cannot have incoming edges".into()));
        }

        let from = self.index_of(&edge.from)?;
        let to = self.index_of(&edge.to)?;
        if self.graph.find_edge(from, to).is_some() {
            return Err(Error::Structural(format!(
                "edge '{}' -> '{}' already exists",
                edge.from, edge.to
            )));
        }

        self.graph.add_edge(from, to, edge);
        Ok(())
    }

    fn index_of(&self, key: &str) -> Result<NodeIndex> {
        self.node_indices
            .get(key)
            .copied()
            .ok_or_else(|| Error::Structural(format!("node '{}' does not exist", key)))
    }

    fn output_type_of(&self, index: NodeIndex) -> &DataType {
        match &self.graph[index].slot {
            Slot::Start => &self.input_type,
            Slot::End => &self.output_type,
            Slot::Node(node) => node.output_type(),
        }
    }

    fn input_type_of(&self, index: NodeIndex) -> &DataType {
        match &self.graph[index].slot {
            Slot::Start => &self.input_type,
            Slot::End => &self.output_type,
            Slot::Node(node) => node.input_type(),
        }
    }

    /// Validates the graph and compiles it for execution.
    ///
    /// Fails if the graph has a cycle, a node without predecessor or
    /// successor, a node fed both as a whole and by field, contributions
    /// that cannot be merged, or an edge whose types do not fit.
    pub fn compile(self, options: CompileOptions) -> Result<CompiledGraph> {
        let order = toposort(&self.graph, None).map_err(|cycle| {
            Error::Structural(format!(
                "graph has a cycle through node '{}'",
                self.graph[cycle.node_id()].key
            ))
        })?;

        for index in self.graph.node_indices() {
            self.check_node(index, &options)?;
        }

        let mut edges = Vec::with_capacity(self.graph.edge_count());
        let mut guards = 0;
        for edge in self.graph.edge_references() {
            let predecessor = self.output_type_of(edge.source());
            let successor = self.input_type_of(edge.target());
            let weight = edge.weight();

            let plan = if weight.is_plain() {
                validate_edge(&weight.from, predecessor, successor)?.map(|guard| {
                    let mut plan = GuardPlan::new();
                    plan.insert(guard);
                    plan
                })
            } else {
                validate_field_mapping(predecessor, successor, &weight.mappings)?
            };

            guards += plan.as_ref().map_or(0, GuardPlan::len);
            edges.push(CompiledEdge::new(weight.effective_mappings(), plan));
        }

        let converters: Vec<ValueConverter> = self
            .graph
            .node_indices()
            .map(|index| {
                ValueConverter::new(
                    self.input_type_of(index).clone(),
                    Arc::clone(&options.merge_registry),
                )
            })
            .collect();

        tracing::info!(
            target: TRACING_TARGET,
            name = options.name.as_deref().unwrap_or_default(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            guards,
            trigger_mode = %options.trigger_mode,
            "graph compiled",
        );

        let Self {
            graph,
            input_type,
            output_type,
            ..
        } = self;

        let (nodes, raw_edges) = graph.into_nodes_edges();
        let mut compiled = DiGraph::with_capacity(nodes.len(), raw_edges.len());
        for (node, converter) in nodes.into_iter().zip(converters) {
            let GraphNode { key, slot } = node.weight;
            let runnable = match slot {
                Slot::Node(node) => Some(node),
                Slot::Start | Slot::End => None,
            };
            compiled.add_node(CompiledNode::new(key, runnable, converter));
        }
        for (raw, edge) in raw_edges.into_iter().zip(edges) {
            compiled.add_edge(raw.source(), raw.target(), edge);
        }

        Ok(CompiledGraph::new(
            compiled,
            order,
            input_type,
            output_type,
            options,
        ))
    }

    /// Checks the incoming and outgoing edges of one node.
    fn check_node(&self, index: NodeIndex, options: &CompileOptions) -> Result<()> {
        let node = &self.graph[index];
        let incoming: Vec<&Edge> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .map(|edge| edge.weight())
            .collect();
        let has_successor = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .next()
            .is_some();

        match node.slot {
            Slot::Start => return Ok(()),
            Slot::End if incoming.is_empty() => {
                return Err(Error::Structural("END has no predecessor".into()));
            }
            Slot::Node(_) if incoming.is_empty() => {
                return Err(Error::Structural(format!(
                    "node '{}' has no predecessor",
                    node.key
                )));
            }
            Slot::Node(_) if !has_successor => {
                return Err(Error::Structural(format!(
                    "node '{}' has no successor",
                    node.key
                )));
            }
            _ => {}
        }

        let mut targets: HashMap<&str, usize> = HashMap::new();
        for target in incoming.iter().flat_map(|edge| edge.targets()) {
            *targets.entry(target).or_default() += 1;
        }

        let whole = targets.get("").copied().unwrap_or_default();
        if whole > 0 && targets.len() > 1 {
            return Err(Error::Structural(format!(
                "node '{}' receives its whole input and individual fields at once",
                node.key
            )));
        }

        match options.trigger_mode {
            NodeTriggerMode::AnyPredecessor => {
                if incoming.iter().any(|edge| !edge.is_plain()) {
                    return Err(Error::Structural(format!(
                        "node '{}' has field mapping edges, which require the {} trigger mode",
                        node.key,
                        NodeTriggerMode::AllPredecessor
                    )));
                }
            }
            NodeTriggerMode::AllPredecessor => {
                let input_type = self.input_type_of(index);
                for (target, count) in targets.into_iter().filter(|(_, count)| *count > 1) {
                    let Ok(ty) = input_type.field_type(target) else {
                        continue;
                    };
                    if options.merge_registry.policy(&ty).is_none() {
                        return Err(Error::Structural(format!(
                            "node '{}' receives {} values for {} of type {}, which cannot be merged",
                            node.key,
                            count,
                            if target.is_empty() {
                                "its input".to_owned()
                            } else {
                                format!("field '{}'", target)
                            },
                            ty
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
