//! Runtime type guards.
//!
//! A guard is bound at compile time to the declared type of one destination
//! field whose assignability could not be decided statically. At run time it
//! checks the dynamic type of every value that reaches the field.

use std::collections::BTreeMap;

use conflux_core::types::DataType;
use conflux_core::value::Value;
use serde::{Deserialize, Serialize};

use super::{FieldMap, HandlerPair, TRACING_TARGET};
use crate::error::{Error, Result};

/// Checks values headed for one destination field against its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeGuard {
    /// Description of the guarded mapping, used in errors.
    pub mapping: String,
    /// Destination field, empty for the whole input.
    pub field: String,
    /// Declared type of the destination field.
    pub expected: DataType,
}

impl TypeGuard {
    /// Creates a guard for one destination field.
    pub fn new(mapping: impl Into<String>, field: impl Into<String>, expected: DataType) -> Self {
        Self {
            mapping: mapping.into(),
            field: field.into(),
            expected,
        }
    }

    /// Passes the value through if its dynamic type fits the declared type.
    pub fn check(&self, value: Value) -> Result<Value> {
        if value.is_assignable_to(&self.expected) {
            return Ok(value);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            mapping = %self.mapping,
            actual = %value.data_type(),
            expected = %self.expected,
            "runtime type guard rejected value",
        );

        Err(Error::RuntimeType {
            mapping: self.mapping.clone(),
            actual: value.data_type().to_string(),
            expected: self.expected.to_string(),
        })
    }
}

/// The guards of one edge, keyed by destination field.
///
/// This is the compiled, serializable result of validating an edge's
/// mappings. An empty plan means the edge needs no runtime checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPlan {
    guards: BTreeMap<String, TypeGuard>,
}

impl GuardPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guard, replacing any previous guard for the same field.
    pub fn insert(&mut self, guard: TypeGuard) {
        self.guards.insert(guard.field.clone(), guard);
    }

    /// Returns the guard for a destination field.
    pub fn guard(&self, field: &str) -> Option<&TypeGuard> {
        self.guards.get(field)
    }

    /// Returns an iterator over the guards in field order.
    pub fn guards(&self) -> impl Iterator<Item = &TypeGuard> {
        self.guards.values()
    }

    /// Returns the number of guarded fields.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns whether no field is guarded.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Checks every guarded field present in the extracted values.
    ///
    /// Fields without a guard pass through unchanged.
    pub fn apply(&self, mut fields: FieldMap) -> Result<FieldMap> {
        for (field, guard) in &self.guards {
            if let Some(value) = fields.remove(field) {
                let checked = guard.check(value)?;
                fields.insert(field.clone(), checked);
            }
        }
        Ok(fields)
    }

    /// Compiles the plan into a handler over extracted values.
    pub fn into_handler(self) -> HandlerPair<FieldMap> {
        HandlerPair::new(move |fields| self.apply(fields))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::error::ErrorKind;
    use crate::stream::{ResultStream, collect};

    fn plan() -> GuardPlan {
        let mut plan = GuardPlan::new();
        plan.insert(TypeGuard::new("from x(field) of node 'a' to n(field)", "n", DataType::Int));
        plan
    }

    fn fields(n: Value) -> FieldMap {
        FieldMap::from([("n".to_owned(), n), ("s".to_owned(), Value::from("free"))])
    }

    #[test]
    fn test_guard_accepts_matching_value() {
        let out = plan().apply(fields(Value::Int(3))).unwrap();
        assert_eq!(out, fields(Value::Int(3)));
    }

    #[test]
    fn test_guard_rejects_mismatch() {
        let err = plan().apply(fields(Value::from("three"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RuntimeType);
        assert_eq!(
            err.to_string(),
            "runtime check failed for mapping from x(field) of node 'a' to n(field): \
             String is not assignable to Int"
        );
    }

    #[test]
    fn test_guard_skips_absent_fields() {
        let only_s = FieldMap::from([("s".to_owned(), Value::Int(0))]);
        assert_eq!(plan().apply(only_s.clone()).unwrap(), only_s);
    }

    #[tokio::test]
    async fn test_plan_handler_transform() {
        let handler = plan().into_handler();
        let chunks: ResultStream<FieldMap> = futures::stream::iter([
            Ok(fields(Value::Int(1))),
            Ok(fields(Value::Bool(true))),
            Ok(fields(Value::Int(2))),
        ])
        .boxed();

        let err = collect(handler.transform(chunks)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RuntimeType);
    }

    #[test]
    fn test_plan_serialization() {
        let json = serde_json::to_string(&plan()).unwrap();
        let back: GuardPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan());
        assert_eq!(back.guard("n").map(|g| &g.expected), Some(&DataType::Int));
    }
}
