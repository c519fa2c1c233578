//! Workflow nodes and their declared inputs.

use crate::mapping::FieldMapping;

/// A node declared in a workflow, together with the mappings feeding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowNode {
    key: String,
    inputs: Vec<FieldMapping>,
}

impl WorkflowNode {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            inputs: Vec::new(),
        }
    }

    /// Returns the node key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the declared input mappings in declaration order.
    pub fn inputs(&self) -> &[FieldMapping] {
        &self.inputs
    }

    /// Declares mappings feeding this node.
    ///
    /// May be called repeatedly; mappings accumulate in order.
    pub fn add_input<I>(&mut self, mappings: I) -> &mut Self
    where
        I: IntoIterator<Item = FieldMapping>,
    {
        self.inputs.extend(mappings);
        self
    }
}
