//! Compile-time validation of edges.

use conflux_core::types::DataType;

use super::{Assignability, FieldMapping, GuardPlan, TRACING_TARGET, TypeGuard, classify, describe};
use crate::error::{Error, Result};

/// Validates the mappings of one edge against the declared types it connects.
///
/// Every mapping is resolved to a pair of field types and classified.
/// A pairing that can never be assigned rejects the edge; a conditional
/// pairing adds a guard for its target field. Returns `None` when no field
/// needs a runtime check.
pub fn validate_field_mapping(
    predecessor: &DataType,
    successor: &DataType,
    mappings: &[FieldMapping],
) -> Result<Option<GuardPlan>> {
    if mappings.is_empty() {
        return Err(Error::Structural(
            "field mapping edge declares no mappings".into(),
        ));
    }

    let from_all = mappings.iter().any(FieldMapping::is_from_all);
    let to_all = mappings.iter().any(FieldMapping::is_to_all);

    if from_all && to_all {
        return Err(Error::Structural(format!(
            "invalid field mappings {}: from all fields to all, use a plain edge instead",
            describe(mappings)
        )));
    }

    if !to_all && !successor.is_constructible() {
        return Err(Error::StaticType {
            mapping: describe(mappings),
            reason: format!(
                "successor input type should be a record or map, actual: {}",
                successor
            ),
        });
    }

    if !from_all && !predecessor.is_constructible() {
        return Err(Error::StaticType {
            mapping: describe(mappings),
            reason: format!(
                "predecessor output type should be a record or map, actual: {}",
                predecessor
            ),
        });
    }

    let mut plan = GuardPlan::new();
    for mapping in mappings {
        let static_error = |reason: String| Error::StaticType {
            mapping: mapping.to_string(),
            reason,
        };

        let source = predecessor
            .field_type(mapping.source())
            .map_err(|err| static_error(err.to_string()))?;
        let target = successor
            .field_type(mapping.target())
            .map_err(|err| static_error(err.to_string()))?;

        match classify(&source, &target) {
            Assignability::Always => {}
            Assignability::Never => {
                return Err(static_error(format!(
                    "field type {} is never assignable to {}",
                    source, target
                )));
            }
            Assignability::Conditional => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    mapping = %mapping,
                    source = %source,
                    target_type = %target,
                    "mapping needs a runtime guard",
                );
                plan.insert(TypeGuard::new(
                    mapping.to_string(),
                    mapping.target(),
                    target,
                ));
            }
        }
    }

    if plan.is_empty() {
        return Ok(None);
    }

    Ok(Some(plan))
}

/// Validates a plain edge passing a whole output into a whole input.
///
/// Returns a whole-value guard when the pairing is conditional.
pub fn validate_edge(
    from_node: &str,
    predecessor: &DataType,
    successor: &DataType,
) -> Result<Option<TypeGuard>> {
    let mapping = FieldMapping::new(from_node);
    match classify(predecessor, successor) {
        Assignability::Always => Ok(None),
        Assignability::Conditional => Ok(Some(TypeGuard::new(
            mapping.to_string(),
            "",
            successor.clone(),
        ))),
        Assignability::Never => Err(Error::StaticType {
            mapping: mapping.to_string(),
            reason: format!(
                "output type {} is never assignable to input type {}",
                predecessor, successor
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use conflux_core::prelude::{InterfaceType, RecordType};

    use super::*;
    use crate::error::ErrorKind;

    fn source() -> DataType {
        RecordType::new("Source")
            .field("Count", DataType::Int)
            .field("Label", DataType::String)
            .field("Payload", DataType::Any)
            .private_field("hidden", DataType::Int)
            .into()
    }

    fn sink() -> DataType {
        RecordType::new("Sink")
            .field("N", DataType::Int)
            .field("Text", DataType::String)
            .into()
    }

    #[test]
    fn test_all_always_needs_no_guard() {
        let mappings = [
            FieldMapping::map_fields("a", "Count", "N"),
            FieldMapping::map_fields("a", "Label", "Text"),
        ];
        let plan = validate_field_mapping(&source(), &sink(), &mappings).unwrap();
        assert!(plan.is_none());

        let plan = validate_field_mapping(
            &source(),
            &DataType::string_map(DataType::Any),
            &[FieldMapping::map_fields("a", "Count", "n")],
        )
        .unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_never_fails_regardless_of_order() {
        let good = FieldMapping::map_fields("a", "Count", "N");
        let bad = FieldMapping::map_fields("a", "Label", "N");

        for mappings in [[good.clone(), bad.clone()], [bad.clone(), good.clone()]] {
            let err = validate_field_mapping(&source(), &sink(), &mappings).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::StaticType);
            assert_eq!(
                err.to_string(),
                "static check failed for mapping from Label(field) of node 'a' to N(field): \
                 field type String is never assignable to Int"
            );
        }
    }

    #[test]
    fn test_conditional_produces_guard() {
        let mappings = [
            FieldMapping::map_fields("a", "Payload", "N"),
            FieldMapping::map_fields("a", "Label", "Text"),
        ];
        let plan = validate_field_mapping(&source(), &sink(), &mappings)
            .unwrap()
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.guard("N").unwrap().expected, DataType::Int);
        assert!(plan.guard("Text").is_none());
    }

    #[test]
    fn test_degenerate_mapping() {
        let err = validate_field_mapping(&source(), &source(), &[FieldMapping::new("a")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let mappings = [
            FieldMapping::to_field("a", "N"),
            FieldMapping::from_field("a", "Count"),
        ];
        let err = validate_field_mapping(&source(), &sink(), &mappings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_unconstructible_sides() {
        let err = validate_field_mapping(
            &source(),
            &DataType::Int,
            &[FieldMapping::map_fields("a", "Count", "N")],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaticType);
        assert!(err.to_string().contains("successor input type"));

        let err = validate_field_mapping(
            &DataType::list(DataType::Int),
            &sink(),
            &[FieldMapping::map_fields("a", "x", "N")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("predecessor output type"));

        let plan = validate_field_mapping(
            &source(),
            &DataType::Int,
            &[FieldMapping::from_field("a", "Count")],
        )
        .unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_unresolvable_fields() {
        for from in ["Missing", "hidden"] {
            let err = validate_field_mapping(
                &source(),
                &sink(),
                &[FieldMapping::map_fields("a", from, "N")],
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::StaticType);
            assert!(err.to_string().contains(from));
        }
    }

    #[test]
    fn test_validate_edge() {
        assert!(validate_edge("a", &DataType::Int, &DataType::Any).unwrap().is_none());

        let guard = validate_edge("a", &DataType::Any, &DataType::Int)
            .unwrap()
            .unwrap();
        assert_eq!(guard.field, "");
        assert_eq!(guard.mapping, "from node 'a'");

        let named = DataType::from(InterfaceType::new("Named").capability("Named"));
        let err = validate_edge("a", &named, &DataType::String).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaticType);
    }
}
