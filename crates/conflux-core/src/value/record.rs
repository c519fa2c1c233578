//! Record values.

use std::sync::Arc;

use super::{FieldAccess, Value};
use crate::error::Result;
use crate::types::RecordType;

/// An instance of a [`RecordType`].
///
/// Field values are stored in declaration order, parallel to the type's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record with every field set to its zero value.
    pub fn new(ty: Arc<RecordType>) -> Self {
        let values = ty.fields().iter().map(|f| f.ty.zero_value()).collect();
        Self { ty, values }
    }

    /// Sets a public field and returns the record.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set_field(name, value.into())?;
        Ok(self)
    }

    /// Returns the record type.
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    /// Returns the value at a field position, ignoring visibility.
    pub(crate) fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replaces the value at a field position, ignoring visibility.
    pub(crate) fn replace_at(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}
