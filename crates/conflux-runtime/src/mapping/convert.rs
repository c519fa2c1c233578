//! Assembling successor inputs from extracted fields.

use std::collections::BTreeMap;
use std::sync::Arc;

use conflux_core::types::DataType;
use conflux_core::value::Value;

use super::{FieldMap, MergeRegistry, assign_one};
use crate::error::{Error, Result};
use crate::stream::{ResultStream, ValueStream, convert_stream};

/// Values gathered for one successor input, keyed by target field.
///
/// Several values under one field come from several mappings and are merged
/// before injection.
pub type FieldValues = BTreeMap<String, Vec<Value>>;

/// Collects extracted fields from several edges into [`FieldValues`].
pub fn gather<I>(field_maps: I) -> FieldValues
where
    I: IntoIterator<Item = FieldMap>,
{
    let mut gathered = FieldValues::new();
    for fields in field_maps {
        for (field, value) in fields {
            gathered.entry(field).or_default().push(value);
        }
    }
    gathered
}

/// Builds values of one declared input type.
#[derive(Debug, Clone)]
pub struct ValueConverter {
    target: DataType,
    merges: Arc<MergeRegistry>,
}

impl ValueConverter {
    /// Creates a converter for the given input type.
    pub fn new(target: DataType, merges: Arc<MergeRegistry>) -> Self {
        Self { target, merges }
    }

    /// Returns the declared input type.
    pub fn target(&self) -> &DataType {
        &self.target
    }

    /// Builds a fresh input value from the gathered fields.
    ///
    /// Values for the whole input are returned directly, merged first if
    /// there are several. Otherwise a zero value of the target type is
    /// allocated and every field is merged and injected into it.
    pub fn convert(&self, mut fields: FieldValues) -> Result<Value> {
        if let Some(whole) = fields.remove("") {
            if !fields.is_empty() {
                return Err(Error::Internal(format!(
                    "input of type {} is mapped both as a whole and by field",
                    self.target
                )));
            }
            return self.merges.merge("", &self.target, whole);
        }

        let mut input = self.target.zero_value();
        for (field, values) in fields {
            let declared = self.target.field_type(&field).map_err(|err| {
                Error::Internal(format!(
                    "field '{}' of {} is not resolvable after validation: {}",
                    field, self.target, err
                ))
            })?;

            let merged = self.merges.merge(&field, &declared, values)?;
            assign_one(&mut input, &self.target, &field, merged).map_err(|err| {
                Error::Internal(format!(
                    "injecting field '{}' into {} failed after validation: {}",
                    field, self.target, err
                ))
            })?;
        }

        Ok(input)
    }

    /// Builds one input value per chunk of extracted fields.
    pub fn convert_stream(&self, chunks: ResultStream<FieldMap>) -> ValueStream {
        let converter = self.clone();
        convert_stream(chunks, move |fields| converter.convert(gather([fields])))
    }
}

#[cfg(test)]
mod tests {
    use conflux_core::prelude::{FieldAccess, List, Map, RecordType};
    use futures::StreamExt;

    use super::*;
    use crate::error::ErrorKind;
    use crate::stream::collect;

    fn converter(target: DataType) -> ValueConverter {
        ValueConverter::new(target, Arc::new(MergeRegistry::new()))
    }

    fn report() -> DataType {
        RecordType::new("Report")
            .field("Title", DataType::String)
            .field("Scores", DataType::list(DataType::Int))
            .into()
    }

    fn boxed_report() -> DataType {
        DataType::boxed(report())
    }

    fn x_map() -> Value {
        Value::Map(Map::from_entries(DataType::Int, [("x", Value::Int(1))]).unwrap())
    }

    #[test]
    fn test_whole_input_shortcut() {
        let target = DataType::string_map(DataType::Int);
        let fields = FieldValues::from([(String::new(), vec![x_map()])]);
        let out = converter(target).convert(fields).unwrap();
        assert_eq!(out, x_map());
    }

    #[test]
    fn test_fields_are_injected_into_fresh_value() {
        let fields = FieldValues::from([("Title".to_owned(), vec![Value::from("q3")])]);
        let out = converter(boxed_report()).convert(fields).unwrap();
        assert_eq!(out.get_field("Title").unwrap(), &Value::from("q3"));
        assert_eq!(out.data_type(), boxed_report());
    }

    #[test]
    fn test_convert_is_idempotent() {
        let fields = gather([
            FieldMap::from([("Title".to_owned(), Value::from("q3"))]),
            FieldMap::from([(
                "Scores".to_owned(),
                Value::List(List::from_items(DataType::Int, [Value::Int(1)]).unwrap()),
            )]),
        ]);

        let converter = converter(report());
        let first = converter.convert(fields.clone()).unwrap();
        let mut second = converter.convert(fields).unwrap();
        assert_eq!(first, second);

        second.set_field("Title", Value::from("changed")).unwrap();
        assert_eq!(first.get_field("Title").unwrap(), &Value::from("q3"));
    }

    #[test]
    fn test_merges_values_for_one_field() {
        let scores = |i| {
            Value::List(List::from_items(DataType::Int, [Value::Int(i)]).unwrap())
        };
        let fields = gather([
            FieldMap::from([("Scores".to_owned(), scores(1))]),
            FieldMap::from([("Scores".to_owned(), scores(2))]),
        ]);

        let out = converter(report()).convert(fields).unwrap();
        let list = out.get_field("Scores").unwrap().as_list().unwrap();
        assert_eq!(list.items(), [Value::Int(1), Value::Int(2)]);

        let fields = gather([
            FieldMap::from([("Title".to_owned(), Value::from("a"))]),
            FieldMap::from([("Title".to_owned(), Value::from("b"))]),
        ]);
        let err = converter(report()).convert(fields).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Merge);
    }

    #[test]
    fn test_injection_failure_is_internal() {
        let fields = FieldValues::from([("Title".to_owned(), vec![Value::Int(1)])]);
        let err = converter(report()).convert(fields).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("Title"));
    }

    #[tokio::test]
    async fn test_convert_stream_per_chunk() {
        let chunks: ResultStream<FieldMap> = futures::stream::iter(
            ["a", "b"].map(|t| Ok(FieldMap::from([("Title".to_owned(), Value::from(t))]))),
        )
        .boxed();

        let out = collect(converter(report()).convert_stream(chunks)).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].get_field("Title").unwrap(), &Value::from("b"));
    }
}
