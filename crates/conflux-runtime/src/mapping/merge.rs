//! Merge policies for fields fed by several mappings.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use conflux_core::Error as AccessError;
use conflux_core::types::{DataType, Kind};
use conflux_core::value::{List, Map, Value};

use crate::error::{Error, Result};

/// Combines several values into one value of the declared type.
pub type MergeFn = Arc<dyn Fn(&DataType, Vec<Value>) -> Result<Value> + Send + Sync>;

/// Merge policies keyed by a field's declared type.
///
/// A policy is looked up by the exact declared type first and by the type's
/// [`Kind`] second. The default registry merges keyed mappings by key union
/// and concatenates lists. A field of any other type that receives more than
/// one value fails with [`Error::Merge`].
#[derive(Clone)]
pub struct MergeRegistry {
    by_type: HashMap<DataType, MergeFn>,
    by_kind: HashMap<Kind, MergeFn>,
}

impl MergeRegistry {
    /// Creates a registry with the default policies.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_kind(Kind::Map, merge_maps);
        registry.register_kind(Kind::List, concat_lists);
        registry
    }

    /// Creates a registry without any policy.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Registers a policy for one exact type.
    pub fn register_type<F>(&mut self, ty: &DataType, merge: F) -> &mut Self
    where
        F: Fn(&DataType, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.by_type.insert(ty.clone(), Arc::new(merge));
        self
    }

    /// Registers a policy for every type of one kind.
    pub fn register_kind<F>(&mut self, kind: Kind, merge: F) -> &mut Self
    where
        F: Fn(&DataType, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.by_kind.insert(kind, Arc::new(merge));
        self
    }

    /// Returns the policy that applies to a declared type.
    pub fn policy(&self, ty: &DataType) -> Option<&MergeFn> {
        self.by_type
            .get(ty)
            .or_else(|| self.by_kind.get(&ty.kind()))
    }

    /// Reduces the values landing on one field to a single value.
    ///
    /// A single value is returned unchanged without consulting any policy.
    pub fn merge(&self, field: &str, ty: &DataType, mut values: Vec<Value>) -> Result<Value> {
        let count = values.len();
        let merge_error = |reason: String| Error::Merge {
            field: field.to_owned(),
            ty: ty.to_string(),
            count,
            reason,
        };

        match count {
            0 => return Err(merge_error("no value to merge".into())),
            1 => return values.pop().ok_or_else(|| merge_error("no value to merge".into())),
            _ => {}
        }

        let policy = self
            .policy(ty)
            .ok_or_else(|| merge_error("no merge policy for this type".into()))?;

        policy(ty, values).map_err(|err| match err {
            Error::Merge { reason, .. } => merge_error(reason),
            other => merge_error(other.to_string()),
        })
    }
}

impl Default for MergeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MergeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.by_type.keys().collect();
        types.sort_by_key(|ty| ty.to_string());
        let mut kinds: Vec<_> = self.by_kind.keys().collect();
        kinds.sort();

        f.debug_struct("MergeRegistry")
            .field("types", &types)
            .field("kinds", &kinds)
            .finish()
    }
}

/// Creates the error a policy returns when its inputs conflict.
///
/// The registry fills in the field, type and value count.
pub fn merge_conflict(reason: impl Into<String>) -> Error {
    Error::Merge {
        field: String::new(),
        ty: String::new(),
        count: 0,
        reason: reason.into(),
    }
}

/// Unions keyed mappings. The same key in two inputs is an error.
fn merge_maps(ty: &DataType, values: Vec<Value>) -> Result<Value> {
    let DataType::Map { key, value } = ty else {
        return Err(AccessError::unsupported_shape()
            .with_message(format!("{} is not a map type", ty))
            .into());
    };

    let mut merged = Map::new((**key).clone(), (**value).clone());
    for item in values {
        let Value::Map(map) = item else {
            return Err(AccessError::type_mismatch()
                .with_message(format!("{} is not a map", item.data_type()))
                .into());
        };

        for (k, v) in map.into_entries() {
            if merged.contains_key(&k) {
                return Err(merge_conflict(format!("duplicated key {} found", k)));
            }
            merged.insert(k, v)?;
        }
    }

    Ok(Value::Map(merged))
}

/// Concatenates lists in input order.
fn concat_lists(ty: &DataType, values: Vec<Value>) -> Result<Value> {
    let DataType::List(elem) = ty else {
        return Err(AccessError::unsupported_shape()
            .with_message(format!("{} is not a list type", ty))
            .into());
    };

    let mut merged = List::new((**elem).clone());
    for item in values {
        let Value::List(list) = item else {
            return Err(AccessError::type_mismatch()
                .with_message(format!("{} is not a list", item.data_type()))
                .into());
        };

        for v in list.into_items() {
            merged.push(v)?;
        }
    }

    Ok(Value::List(merged))
}
