//! Record types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DataType;

/// Whether a record field can be read and written from outside the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable and writable by field mappings.
    #[default]
    Public,
    /// Hidden from field mappings.
    Private,
}

/// A single field of a [`RecordType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub ty: DataType,
    /// Field visibility.
    #[serde(default)]
    pub visibility: Visibility,
}

impl FieldDef {
    /// Returns whether the field is visible to field mappings.
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A named record type with ordered fields.
///
/// Records also declare the capabilities they provide, which decides
/// whether they satisfy an [`InterfaceType`](super::InterfaceType).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType {
    /// Record name.
    name: String,
    /// Fields in declaration order.
    fields: Vec<FieldDef>,
    /// Capabilities provided by the record.
    #[serde(default)]
    capabilities: BTreeSet<String>,
}

impl RecordType {
    /// Creates a new record type without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Adds a public field.
    pub fn field(self, name: impl Into<String>, ty: DataType) -> Self {
        self.push_field(name.into(), ty, Visibility::Public)
    }

    /// Adds a private field.
    pub fn private_field(self, name: impl Into<String>, ty: DataType) -> Self {
        self.push_field(name.into(), ty, Visibility::Private)
    }

    /// Declares a capability provided by this record.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    fn push_field(mut self, name: String, ty: DataType, visibility: Visibility) -> Self {
        // Redeclaring a field replaces it in place.
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                existing.ty = ty;
                existing.visibility = visibility;
            }
            None => self.fields.push(FieldDef {
                name,
                ty,
                visibility,
            }),
        }
        self
    }

    /// Returns the record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the declared capabilities.
    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns the position of a field by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns a field definition by name.
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
