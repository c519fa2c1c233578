//! The dynamic value enum.

use super::{List, Map, Record};
use crate::types::{DataType, Kind};

/// A dynamically typed value flowing between nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// UTF-8 string scalar.
    String(String),
    /// Ordered sequence.
    List(List),
    /// Keyed mapping.
    Map(Map),
    /// Structured record.
    Record(Record),
    /// Owned indirection around another value.
    Boxed(Box<Value>),
}

impl Value {
    /// Wraps a value in a box.
    pub fn boxed(inner: impl Into<Value>) -> Self {
        Self::Boxed(Box::new(inner.into()))
    }

    /// Returns the coarse shape of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::String(_) => Kind::String,
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Boxed(_) => Kind::Boxed,
        }
    }

    /// Returns the dynamic type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::String(_) => DataType::String,
            Self::List(list) => DataType::list(list.elem_type().clone()),
            Self::Map(map) => DataType::map(map.key_type().clone(), map.value_type().clone()),
            Self::Record(record) => DataType::Record(record.record_type().clone()),
            Self::Boxed(inner) => DataType::boxed(inner.data_type()),
        }
    }

    /// Returns whether this value can be stored where `dest` is declared.
    pub fn is_assignable_to(&self, dest: &DataType) -> bool {
        self.data_type().is_assignable_to(dest)
    }

    /// Strips every layer of boxing.
    pub fn unboxed(&self) -> &Value {
        let mut value = self;
        while let Self::Boxed(inner) = value {
            value = inner;
        }
        value
    }

    /// Mutable variant of [`Value::unboxed`].
    pub fn unboxed_mut(&mut self) -> &mut Value {
        let mut value = self;
        while let Self::Boxed(inner) = value {
            value = inner;
        }
        value
    }

    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the list, if this is one.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Self::List(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}
