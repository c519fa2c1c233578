//! Prelude module for convenient imports.

pub use conflux_core::prelude::*;

pub use crate::error::{Error as RuntimeError, ErrorKind as RuntimeErrorKind, Result as RuntimeResult};
pub use crate::graph::{
    CompileOptions, CompiledGraph, END, Graph, Lambda, Node, NodeTriggerMode, START,
};
pub use crate::mapping::{FieldMapping, GuardPlan, MergeRegistry, TypeGuard};
pub use crate::stream::{ValueStream, collect, from_values};
pub use crate::workflow::{Workflow, WorkflowNode};
