//! Declared data types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{InterfaceType, Kind, RecordType};
use crate::error::{Error, Result};
use crate::value::{List, Map, Record, Value};

/// The declared type of a node input, node output, record field or map value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Any value, with no capability requirements.
    Any,
    /// The absence of a value.
    Null,
    /// Boolean scalar.
    Bool,
    /// Signed integer scalar.
    Int,
    /// Floating point scalar.
    Float,
    /// UTF-8 string scalar.
    String,
    /// Ordered sequence with a single element type.
    List(Box<DataType>),
    /// Keyed mapping.
    Map {
        /// Key type.
        key: Box<DataType>,
        /// Value type.
        value: Box<DataType>,
    },
    /// Structured record.
    Record(Arc<RecordType>),
    /// Open capability set.
    Interface(Arc<InterfaceType>),
    /// Owned indirection around another type.
    Boxed(Box<DataType>),
}

impl DataType {
    /// Creates a list type.
    pub fn list(elem: DataType) -> Self {
        Self::List(Box::new(elem))
    }

    /// Creates a keyed mapping type.
    pub fn map(key: DataType, value: DataType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Creates a string-keyed mapping type.
    pub fn string_map(value: DataType) -> Self {
        Self::map(Self::String, value)
    }

    /// Creates a record type.
    pub fn record(record: RecordType) -> Self {
        Self::Record(Arc::new(record))
    }

    /// Creates an interface type.
    pub fn interface(interface: InterfaceType) -> Self {
        Self::Interface(Arc::new(interface))
    }

    /// Creates a boxed type.
    pub fn boxed(inner: DataType) -> Self {
        Self::Boxed(Box::new(inner))
    }

    /// Returns the coarse shape of this type.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Any => Kind::Any,
            Self::Null => Kind::Null,
            Self::Bool => Kind::Bool,
            Self::Int => Kind::Int,
            Self::Float => Kind::Float,
            Self::String => Kind::String,
            Self::List(_) => Kind::List,
            Self::Map { .. } => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Interface(_) => Kind::Interface,
            Self::Boxed(_) => Kind::Boxed,
        }
    }

    /// Strips every layer of boxing.
    pub fn unboxed(&self) -> &DataType {
        let mut ty = self;
        while let Self::Boxed(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Returns whether values of this type may hold values of other types.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Any | Self::Interface(_))
    }

    /// Returns whether a fresh instance of this type can be assembled field by field.
    ///
    /// That is the case for keyed mappings, records and boxed records.
    pub fn is_constructible(&self) -> bool {
        match self {
            Self::Map { .. } => true,
            other => matches!(other.unboxed(), Self::Record(_)),
        }
    }

    /// Returns whether this type provides every capability of the interface.
    pub fn implements(&self, interface: &InterfaceType) -> bool {
        if interface.capabilities().is_empty() {
            return true;
        }

        match self.unboxed() {
            Self::Record(record) => interface.is_satisfied_by(record.capabilities()),
            Self::Interface(other) => interface.is_satisfied_by(other.capabilities()),
            _ => false,
        }
    }

    /// Returns whether every value of this type can be stored where `dest` is declared.
    pub fn is_assignable_to(&self, dest: &DataType) -> bool {
        if self == dest {
            return true;
        }

        match dest {
            Self::Any => true,
            Self::Interface(interface) => matches!(self, Self::Null) || self.implements(interface),
            _ => false,
        }
    }

    /// Resolves the declared type of a field or key.
    ///
    /// An empty name resolves to the type itself. Keyed mappings resolve to
    /// their value type and require string keys; records resolve through any
    /// boxing to the named public field.
    pub fn field_type(&self, name: &str) -> Result<DataType> {
        if name.is_empty() {
            return Ok(self.clone());
        }

        if let Self::Map { key, value } = self {
            if **key != Self::String {
                return Err(Error::unsupported_key_type()
                    .with_message(format!("type {} is not a map with string keys", self)));
            }
            return Ok((**value).clone());
        }

        let Self::Record(record) = self.unboxed() else {
            return Err(Error::unsupported_shape()
                .with_message(format!("type {} is not a record", self)));
        };

        let Some(field) = record.field_def(name) else {
            return Err(Error::field_not_found()
                .with_message(format!("type {} has no field {}", self, name)));
        };

        if !field.is_public() {
            return Err(Error::field_not_accessible()
                .with_message(format!("type {} has a private field {}", self, name)));
        }

        Ok(field.ty.clone())
    }

    /// Allocates a fresh, unshared zero value of this type.
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Any | Self::Null | Self::Interface(_) => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::String => Value::String(String::new()),
            Self::List(elem) => Value::List(List::new((**elem).clone())),
            Self::Map { key, value } => Value::Map(Map::new((**key).clone(), (**value).clone())),
            Self::Record(record) => Value::Record(Record::new(record.clone())),
            Self::Boxed(inner) => Value::Boxed(Box::new(inner.zero_value())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Null => f.write_str("Null"),
            Self::Bool => f.write_str("Bool"),
            Self::Int => f.write_str("Int"),
            Self::Float => f.write_str("Float"),
            Self::String => f.write_str("String"),
            Self::List(elem) => write!(f, "List<{}>", elem),
            Self::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
            Self::Record(record) => f.write_str(record.name()),
            Self::Interface(interface) => write!(f, "dyn {}", interface.name()),
            Self::Boxed(inner) => write!(f, "Box<{}>", inner),
        }
    }
}

impl From<RecordType> for DataType {
    fn from(record: RecordType) -> Self {
        Self::record(record)
    }
}

impl From<InterfaceType> for DataType {
    fn from(interface: InterfaceType) -> Self {
        Self::interface(interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn user() -> DataType {
        RecordType::new("User")
            .field("Name", DataType::String)
            .field("Age", DataType::Int)
            .private_field("password", DataType::String)
            .with_capability("Named")
            .into()
    }

    fn named() -> InterfaceType {
        InterfaceType::new("Named").capability("Named")
    }

    #[test]
    fn test_display() {
        let ty = DataType::boxed(DataType::string_map(DataType::list(DataType::Int)));
        assert_eq!(ty.to_string(), "Box<Map<String, List<Int>>>");
        assert_eq!(DataType::from(named()).to_string(), "dyn Named");
        assert_eq!(user().to_string(), "User");
    }

    #[test]
    fn test_field_type_record() {
        assert_eq!(user().field_type("Name").unwrap(), DataType::String);
        assert_eq!(
            DataType::boxed(user()).field_type("Age").unwrap(),
            DataType::Int
        );
        assert_eq!(user().field_type("").unwrap(), user());
    }

    #[test]
    fn test_field_type_errors() {
        let err = user().field_type("Missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);

        let err = user().field_type("password").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotAccessible);

        let err = DataType::Int.field_type("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedShape);

        let err = DataType::map(DataType::Int, DataType::Int)
            .field_type("x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedKeyType);
    }

    #[test]
    fn test_assignability() {
        let iface = DataType::from(named());
        assert!(DataType::Int.is_assignable_to(&DataType::Int));
        assert!(DataType::Int.is_assignable_to(&DataType::Any));
        assert!(user().is_assignable_to(&iface));
        assert!(DataType::boxed(user()).is_assignable_to(&iface));
        assert!(DataType::Null.is_assignable_to(&iface));
        assert!(!DataType::Int.is_assignable_to(&iface));
        assert!(!DataType::Any.is_assignable_to(&DataType::Int));
        assert!(!DataType::Any.is_assignable_to(&iface));
        assert!(!DataType::list(DataType::Int).is_assignable_to(&DataType::list(DataType::Any)));
    }

    #[test]
    fn test_constructible() {
        assert!(user().is_constructible());
        assert!(DataType::boxed(user()).is_constructible());
        assert!(DataType::string_map(DataType::Any).is_constructible());
        assert!(!DataType::boxed(DataType::Int).is_constructible());
        assert!(!DataType::Any.is_constructible());
    }

    #[test]
    fn test_zero_value_is_fresh() {
        let ty = user();
        let a = ty.zero_value();
        let b = ty.zero_value();
        assert_eq!(a, b);
        assert_eq!(a.data_type(), ty);
        assert_eq!(DataType::Any.zero_value(), Value::Null);
    }

    #[test]
    fn test_serialization() {
        let ty = DataType::string_map(DataType::boxed(user()));
        let json = serde_json::to_string(&ty).unwrap();
        let deserialized: DataType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, deserialized);
    }
}
