//! Graph compilation options.

use std::sync::Arc;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::mapping::MergeRegistry;

/// When a node with several predecessors runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeTriggerMode {
    /// The node waits for every predecessor and receives all their contributions.
    #[default]
    AllPredecessor,
    /// The node runs on the output of its earliest predecessor alone.
    AnyPredecessor,
}

/// Options for compiling a graph.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CompileOptions {
    /// Trigger mode applied to every node.
    #[builder(default)]
    pub trigger_mode: NodeTriggerMode,

    /// Merge policies for inputs fed by several mappings.
    #[builder(default)]
    pub merge_registry: Arc<MergeRegistry>,

    /// Graph name used in logs.
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,
}

impl CompileOptions {
    /// Returns a builder for compile options.
    pub fn builder() -> CompileOptionsBuilder {
        CompileOptionsBuilder::default()
    }
}

impl CompileOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(name)) = &self.name {
            if name.trim().is_empty() {
                return Err("name must not be blank".into());
            }
        }
        Ok(())
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            trigger_mode: NodeTriggerMode::default(),
            merge_registry: Arc::default(),
            name: None,
        }
    }
}
