//! Compiled edges.

use std::sync::Arc;

use conflux_core::value::Value;

use crate::error::Result;
use crate::mapping::{FieldMap, FieldMapping, GuardPlan, HandlerPair, field_map};
use crate::stream::{ResultStream, ValueStream, convert_stream};

/// An edge ready for execution.
///
/// Turns each predecessor output into the fields it contributes to the
/// successor input, then runs the edge's guards over them.
pub struct CompiledEdge {
    mappings: Arc<[FieldMapping]>,
    plan: Option<GuardPlan>,
    handler: Option<HandlerPair<FieldMap>>,
}

impl CompiledEdge {
    /// Creates a compiled edge from its mappings and guard plan.
    pub(crate) fn new(mappings: Vec<FieldMapping>, plan: Option<GuardPlan>) -> Self {
        let handler = plan.clone().map(GuardPlan::into_handler);
        Self {
            mappings: mappings.into(),
            plan,
            handler,
        }
    }

    /// Returns the mappings applied to each predecessor output.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Returns the guards checked at run time, if any.
    pub fn plan(&self) -> Option<&GuardPlan> {
        self.plan.as_ref()
    }

    /// Extracts and checks the contribution of one predecessor output.
    pub(crate) fn apply(&self, output: &Value) -> Result<FieldMap> {
        let fields = field_map(&self.mappings, output)?;
        match &self.handler {
            Some(handler) => handler.invoke(fields),
            None => Ok(fields),
        }
    }

    /// Extracts and checks the contribution of every chunk of an output stream.
    pub(crate) fn transform(&self, output: ValueStream) -> ResultStream<FieldMap> {
        let mappings = Arc::clone(&self.mappings);
        let fields = convert_stream(output, move |value| field_map(&mappings, &value));
        match &self.handler {
            Some(handler) => handler.transform(fields),
            None => fields,
        }
    }
}
