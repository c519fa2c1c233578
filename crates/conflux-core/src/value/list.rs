//! Typed list values.

use super::Value;
use crate::error::{Error, Result};
use crate::types::DataType;

/// An ordered sequence of values sharing one declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    elem: DataType,
    items: Vec<Value>,
}

impl List {
    /// Creates an empty list.
    pub fn new(elem: DataType) -> Self {
        Self {
            elem,
            items: Vec::new(),
        }
    }

    /// Creates a list from items, checking every item against the element type.
    pub fn from_items(elem: DataType, items: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut list = Self::new(elem);
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Returns the declared element type.
    pub fn elem_type(&self) -> &DataType {
        &self.elem
    }

    /// Appends an item.
    pub fn push(&mut self, item: Value) -> Result<()> {
        if !item.is_assignable_to(&self.elem) {
            return Err(Error::type_mismatch().with_message(format!(
                "list item has a mismatched type. from={}, to={}",
                item.data_type(),
                self.elem
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Appends every item of another list with the same element type.
    pub fn append(&mut self, other: List) -> Result<()> {
        if other.elem != self.elem {
            return Err(Error::type_mismatch().with_message(format!(
                "cannot append List<{}> to List<{}>",
                other.elem, self.elem
            )));
        }
        self.items.extend(other.items);
        Ok(())
    }

    /// Returns the items.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the list and returns its items.
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_checks_elem_type() {
        let mut list = List::new(DataType::Int);
        assert!(list.push(Value::Int(1)).is_ok());
        assert!(list.push(Value::from("x")).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_append() {
        let mut a = List::from_items(DataType::Int, [Value::Int(1)]).unwrap();
        let b = List::from_items(DataType::Int, [Value::Int(2), Value::Int(3)]).unwrap();
        a.append(b).unwrap();
        assert_eq!(a.items(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);

        let c = List::new(DataType::String);
        assert!(a.append(c).is_err());
    }
}
