//! Reading fields out of predecessor outputs.

use std::collections::BTreeMap;

use conflux_core::value::{FieldAccess, Value};

use super::FieldMapping;
use crate::error::Result;

/// Values extracted for one successor, keyed by target field.
///
/// The empty key stands for the whole successor input.
pub type FieldMap = BTreeMap<String, Value>;

/// Extracts a field or key from a value.
///
/// An empty name returns the value itself. Keyed mappings are read by key,
/// records (boxed or not) by public field name; any other shape fails.
pub fn take_one<'a>(input: &'a Value, from: &str) -> Result<&'a Value> {
    if from.is_empty() {
        return Ok(input);
    }

    let taken = match input {
        Value::Map(map) => map.get_key(from)?,
        other => other.get_field(from)?,
    };
    Ok(taken)
}

/// Applies every mapping of one edge to a predecessor output.
pub fn field_map(mappings: &[FieldMapping], input: &Value) -> Result<FieldMap> {
    let mut result = FieldMap::new();
    for mapping in mappings {
        let taken = take_one(input, mapping.source())?;
        result.insert(mapping.target().to_owned(), taken.clone());
    }
    Ok(result)
}
