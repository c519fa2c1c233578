//! Typed keyed mappings.

use std::collections::BTreeMap;

use derive_more::{Display, From};

use super::Value;
use crate::error::{Error, Result};
use crate::types::DataType;

/// A scalar map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub enum MapKey {
    /// Boolean key.
    #[display("{_0}")]
    Bool(bool),
    /// Integer key.
    #[display("{_0}")]
    Int(i64),
    /// String key.
    #[display("{_0}")]
    String(String),
}

impl MapKey {
    /// Returns the type of this key.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::String(_) => DataType::String,
        }
    }
}

impl From<&str> for MapKey {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

/// A keyed mapping with declared key and value types.
///
/// Entries are kept sorted by key so that iteration is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    key: DataType,
    value: DataType,
    entries: BTreeMap<MapKey, Value>,
}

impl Map {
    /// Creates an empty mapping.
    pub fn new(key: DataType, value: DataType) -> Self {
        Self {
            key,
            value,
            entries: BTreeMap::new(),
        }
    }

    /// Creates an empty string-keyed mapping.
    pub fn string_keyed(value: DataType) -> Self {
        Self::new(DataType::String, value)
    }

    /// Creates a string-keyed mapping from entries, checking every value.
    pub fn from_entries<K, I>(value: DataType, entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut map = Self::string_keyed(value);
        for (k, v) in entries {
            map.insert(MapKey::String(k.into()), v)?;
        }
        Ok(map)
    }

    /// Returns the declared key type.
    pub fn key_type(&self) -> &DataType {
        &self.key
    }

    /// Returns the declared value type.
    pub fn value_type(&self) -> &DataType {
        &self.value
    }

    /// Returns whether the mapping accepts string keys.
    pub fn has_string_keys(&self) -> bool {
        self.key == DataType::String
    }

    /// Inserts an entry, returning the previous value for the key.
    ///
    /// Nothing is written if the key or value type does not match.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: Value) -> Result<Option<Value>> {
        let key = key.into();
        if key.data_type() != self.key {
            return Err(Error::type_mismatch().with_message(format!(
                "map key has a mismatched type. key={}, from={}, to={}",
                key,
                key.data_type(),
                self.key
            )));
        }

        if !value.is_assignable_to(&self.value) {
            return Err(Error::type_mismatch().with_message(format!(
                "map value has a mismatched type. key={}, from={}, to={}",
                key,
                value.data_type(),
                self.value
            )));
        }

        Ok(self.entries.insert(key, value))
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns whether the key is present.
    pub fn contains_key(&self, key: &MapKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        self.entries.iter()
    }

    /// Consumes the mapping and returns its entries.
    pub fn into_entries(self) -> BTreeMap<MapKey, Value> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_checks_types() {
        let mut map = Map::string_keyed(DataType::Int);
        assert!(map.insert("a", Value::Int(1)).unwrap().is_none());
        assert_eq!(map.insert("a", Value::Int(2)).unwrap(), Some(Value::Int(1)));
        assert!(map.insert("b", Value::from("x")).is_err());
        assert!(map.insert(7_i64, Value::Int(1)).is_err());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_from_entries() {
        let map = Map::from_entries(DataType::Any, [("x", Value::Int(1))]).unwrap();
        assert_eq!(map.get(&MapKey::from("x")), Some(&Value::Int(1)));
        assert!(map.has_string_keys());
    }

    #[test]
    fn test_map_key_display() {
        assert_eq!(MapKey::from("k").to_string(), "k");
        assert_eq!(MapKey::from(3_i64).to_string(), "3");
    }
}
