//! Capability-based field and key access.

use super::{Map, MapKey, Record, Value};
use crate::error::{Error, Result};
use crate::types::Kind;

/// Reads and writes named parts of a value.
///
/// Records expose fields, keyed mappings expose string keys. Every other
/// shape rejects both with [`ErrorKind::UnsupportedShape`](crate::ErrorKind::UnsupportedShape).
/// Setters check the destination type before writing, so a failed call
/// leaves the target untouched.
pub trait FieldAccess {
    /// Returns the coarse shape of the target.
    fn kind(&self) -> Kind;

    /// Reads a public record field.
    fn get_field(&self, name: &str) -> Result<&Value> {
        Err(Error::unsupported_shape()
            .with_message(format!("{} has no field {}", self.kind(), name)))
    }

    /// Writes a public record field.
    fn set_field(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(Error::unsupported_shape()
            .with_message(format!("{} has no field {}", self.kind(), name)))
    }

    /// Reads the entry of a string-keyed mapping.
    fn get_key(&self, key: &str) -> Result<&Value> {
        Err(Error::unsupported_shape()
            .with_message(format!("{} has no key {}", self.kind(), key)))
    }

    /// Writes the entry of a string-keyed mapping.
    fn set_key(&mut self, key: &str, _value: Value) -> Result<()> {
        Err(Error::unsupported_shape()
            .with_message(format!("{} has no key {}", self.kind(), key)))
    }
}

impl FieldAccess for Record {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn get_field(&self, name: &str) -> Result<&Value> {
        let ty = self.record_type();
        let index = ty.position(name).ok_or_else(|| {
            Error::field_not_found()
                .with_message(format!("field={}, type={}", name, ty.name()))
        })?;

        if !ty.fields()[index].is_public() {
            return Err(Error::field_not_accessible()
                .with_message(format!("field={}, type={}", name, ty.name())));
        }

        self.value_at(index).ok_or_else(|| {
            Error::field_not_found()
                .with_message(format!("field={}, type={}", name, ty.name()))
        })
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        let ty = self.record_type().clone();
        let index = ty.position(name).ok_or_else(|| {
            Error::field_not_found()
                .with_message(format!("field={}, type={}", name, ty.name()))
        })?;

        let field = &ty.fields()[index];
        if !field.is_public() {
            return Err(Error::field_not_writable()
                .with_message(format!("field={}, type={}", name, ty.name())));
        }

        if !value.is_assignable_to(&field.ty) {
            return Err(Error::type_mismatch().with_message(format!(
                "field={}, from={}, to={}",
                name,
                value.data_type(),
                field.ty
            )));
        }

        self.replace_at(index, value);
        Ok(())
    }
}

impl FieldAccess for Map {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn get_key(&self, key: &str) -> Result<&Value> {
        if !self.has_string_keys() {
            return Err(Error::unsupported_key_type()
                .with_message(format!("map key type is {}", self.key_type())));
        }

        self.get(&MapKey::from(key)).ok_or_else(|| {
            Error::key_not_found().with_message(format!(
                "key={}, type=Map<{}, {}>",
                key,
                self.key_type(),
                self.value_type()
            ))
        })
    }

    fn set_key(&mut self, key: &str, value: Value) -> Result<()> {
        if !self.has_string_keys() {
            return Err(Error::unsupported_key_type()
                .with_message(format!("map key type is {}", self.key_type())));
        }

        self.insert(key, value)?;
        Ok(())
    }
}

impl FieldAccess for Value {
    fn kind(&self) -> Kind {
        Value::kind(self)
    }

    fn get_field(&self, name: &str) -> Result<&Value> {
        match self.unboxed() {
            Value::Record(record) => record.get_field(name),
            other => Err(Error::unsupported_shape().with_message(format!(
                "{} is not a record or boxed record, field={}",
                other.data_type(),
                name
            ))),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match self.unboxed_mut() {
            Value::Record(record) => record.set_field(name, value),
            other => Err(Error::unsupported_shape().with_message(format!(
                "{} is not a record or boxed record, field={}",
                other.data_type(),
                name
            ))),
        }
    }

    fn get_key(&self, key: &str) -> Result<&Value> {
        match self {
            Value::Map(map) => map.get_key(key),
            other => Err(Error::unsupported_shape().with_message(format!(
                "{} is not a map, key={}",
                other.data_type(),
                key
            ))),
        }
    }

    fn set_key(&mut self, key: &str, value: Value) -> Result<()> {
        match self {
            Value::Map(map) => map.set_key(key, value),
            other => Err(Error::unsupported_shape().with_message(format!(
                "{} is not a map, key={}",
                other.data_type(),
                key
            ))),
        }
    }
}
