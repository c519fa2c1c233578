//! Edges between graph nodes.

use serde::{Deserialize, Serialize};

use crate::mapping::FieldMapping;

/// A declared data-flow connection between two nodes.
///
/// A plain edge passes the whole predecessor output as the whole successor
/// input. An edge with mappings routes individual fields instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Key of the source node.
    pub from: String,
    /// Key of the target node.
    pub to: String,
    /// Field mappings, empty for a plain edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<FieldMapping>,
}

impl Edge {
    /// Creates a plain edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            mappings: Vec::new(),
        }
    }

    /// Creates an edge carrying field mappings.
    ///
    /// Every mapping is rebound to the edge's source node.
    pub fn with_mappings<I>(from: impl Into<String>, to: impl Into<String>, mappings: I) -> Self
    where
        I: IntoIterator<Item = FieldMapping>,
    {
        let from = from.into();
        let mappings = mappings
            .into_iter()
            .map(|m| m.with_from_node(&from))
            .collect();

        Self {
            from,
            to: to.into(),
            mappings,
        }
    }

    /// Returns whether the edge passes the whole value.
    pub fn is_plain(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns the mappings applied at run time.
    ///
    /// A plain edge behaves like a single whole-to-whole mapping.
    pub(crate) fn effective_mappings(&self) -> Vec<FieldMapping> {
        if self.is_plain() {
            return vec![FieldMapping::new(self.from.clone())];
        }
        self.mappings.clone()
    }

    /// Returns the target fields this edge writes, empty for the whole input.
    pub(crate) fn targets(&self) -> impl Iterator<Item = &str> {
        let whole = self.is_plain().then_some("");
        whole
            .into_iter()
            .chain(self.mappings.iter().map(FieldMapping::target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mappings_are_rebound_to_source() {
        let edge = Edge::with_mappings("a", "b", [FieldMapping::map_fields("other", "x", "y")]);
        assert_eq!(edge.mappings[0].from_node(), "a");
        assert!(!edge.is_plain());
        assert_eq!(edge.targets().collect::<Vec<_>>(), ["y"]);
    }

    #[test]
    fn test_plain_edge() {
        let edge = Edge::new("a", "b");
        assert!(edge.is_plain());
        assert_eq!(edge.targets().collect::<Vec<_>>(), [""]);
        assert!(edge.effective_mappings()[0].is_empty());
    }

    #[test]
    fn test_serialization() {
        let edge = Edge::new("a", "b");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json, serde_json::json!({ "from": "a", "to": "b" }));
    }
}
