//! Compiled nodes.

use std::sync::Arc;

use crate::graph::Node;
use crate::mapping::ValueConverter;

/// A node ready for execution.
///
/// The virtual start and end nodes carry no runnable; their input passes
/// through unchanged.
pub struct CompiledNode {
    key: String,
    runnable: Option<Arc<dyn Node>>,
    converter: ValueConverter,
}

impl CompiledNode {
    pub(crate) fn new(key: String, runnable: Option<Arc<dyn Node>>, converter: ValueConverter) -> Self {
        Self {
            key,
            runnable,
            converter,
        }
    }

    /// Returns the node key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the user node, `None` for the start and end nodes.
    pub fn runnable(&self) -> Option<&Arc<dyn Node>> {
        self.runnable.as_ref()
    }

    /// Returns the converter assembling this node's input.
    pub fn converter(&self) -> &ValueConverter {
        &self.converter
    }
}
