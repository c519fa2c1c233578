//! Writing fields into successor inputs.

use conflux_core::Error as AccessError;
use conflux_core::types::DataType;
use conflux_core::value::{FieldAccess, Value};

use crate::error::Result;

/// Writes a value into a field or key of a destination.
///
/// An empty name replaces the whole destination, which requires the value to
/// be assignable to `declared`. Keyed mappings are written by key, records
/// (boxed or not) by public field name. Every check runs before the write, so
/// a failed call leaves `dest` untouched.
pub fn assign_one(dest: &mut Value, declared: &DataType, to: &str, value: Value) -> Result<()> {
    if to.is_empty() {
        if !value.is_assignable_to(declared) {
            return Err(AccessError::type_mismatch()
                .with_message(format!(
                    "mapping entire value has a mismatched type. from={}, to={}",
                    value.data_type(),
                    declared
                ))
                .into());
        }

        *dest = value;
        return Ok(());
    }

    match dest {
        Value::Map(map) => map.set_key(to, value)?,
        other => other.set_field(to, value)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use conflux_core::prelude::*;

    use super::*;
    use crate::error::Error;
    use crate::mapping::take_one;

    fn user_type() -> DataType {
        RecordType::new("User")
            .field("Name", DataType::String)
            .field("Age", DataType::Int)
            .private_field("secret", DataType::String)
            .into()
    }

    fn access_kind(err: Error) -> ErrorKind {
        match err {
            Error::Access(err) => err.kind(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_assign_whole_value() {
        let declared = DataType::Int;
        let mut dest = declared.zero_value();
        assign_one(&mut dest, &declared, "", Value::Int(5)).unwrap();
        assert_eq!(dest, Value::Int(5));

        let err = assign_one(&mut dest, &declared, "", Value::from("x")).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::TypeMismatch);
        assert_eq!(dest, Value::Int(5));
    }

    #[test]
    fn test_assign_into_boxed_record() {
        let declared = DataType::boxed(user_type());
        let mut dest = declared.zero_value();
        assign_one(&mut dest, &declared, "Age", Value::Int(36)).unwrap();
        assert_eq!(dest.get_field("Age").unwrap(), &Value::Int(36));

        let before = dest.clone();
        let err = assign_one(&mut dest, &declared, "Age", Value::from("old")).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::TypeMismatch);

        let err = assign_one(&mut dest, &declared, "secret", Value::from("x")).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::FieldNotWritable);

        let err = assign_one(&mut dest, &declared, "Missing", Value::Null).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::FieldNotFound);
        assert_eq!(dest, before);
    }

    #[test]
    fn test_assign_into_map() {
        let declared = DataType::string_map(DataType::Int);
        let mut dest = declared.zero_value();
        assign_one(&mut dest, &declared, "x", Value::Int(1)).unwrap();
        assert_eq!(dest.get_key("x").unwrap(), &Value::Int(1));

        let err = assign_one(&mut dest, &declared, "y", Value::Bool(true)).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::TypeMismatch);

        let declared = DataType::map(DataType::Int, DataType::Int);
        let mut dest = declared.zero_value();
        let err = assign_one(&mut dest, &declared, "x", Value::Int(1)).unwrap_err();
        assert_eq!(access_kind(err), ErrorKind::UnsupportedKeyType);
    }

    #[test]
    fn test_extract_then_inject_reproduces_value() {
        let ty = match user_type() {
            DataType::Record(ty) => ty,
            _ => unreachable!(),
        };
        let source: Value = Record::new(Arc::clone(&ty))
            .with_field("Name", "ada")
            .unwrap()
            .with_field("Age", 36)
            .unwrap()
            .into();

        let declared = user_type();
        let mut dest = declared.zero_value();
        for field in ["Name", "Age"] {
            let taken = take_one(&source, field).unwrap().clone();
            assign_one(&mut dest, &declared, field, taken).unwrap();
        }
        assert_eq!(dest, source);
    }
}
