//! Field mapping descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Routes one part of a predecessor's output into one part of a successor's input.
///
/// An empty source field stands for the whole predecessor output, an empty
/// target field for the whole successor input. A mapping with both empty is
/// equivalent to a plain edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMapping {
    from_node: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    to: String,
}

impl FieldMapping {
    /// Creates a whole-to-whole mapping from the given node.
    pub fn new(from_node: impl Into<String>) -> Self {
        Self {
            from_node: from_node.into(),
            from: String::new(),
            to: String::new(),
        }
    }

    /// Maps the whole predecessor output to one successor field.
    pub fn to_field(from_node: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from_node).to(to)
    }

    /// Maps one predecessor field to the whole successor input.
    ///
    /// Such a mapping claims the entire input, so it must be the only
    /// mapping into its successor.
    pub fn from_field(from_node: impl Into<String>, from: impl Into<String>) -> Self {
        Self::new(from_node).from(from)
    }

    /// Maps one predecessor field to one successor field.
    pub fn map_fields(
        from_node: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::new(from_node).from(from).to(to)
    }

    /// Sets the source field or key.
    pub fn from(mut self, field: impl Into<String>) -> Self {
        self.from = field.into();
        self
    }

    /// Sets the target field or key.
    pub fn to(mut self, field: impl Into<String>) -> Self {
        self.to = field.into();
        self
    }

    /// Returns the key of the source node.
    pub fn from_node(&self) -> &str {
        &self.from_node
    }

    /// Returns the source field, empty for the whole output.
    pub fn source(&self) -> &str {
        &self.from
    }

    /// Returns the target field, empty for the whole input.
    pub fn target(&self) -> &str {
        &self.to
    }

    /// Returns whether the mapping reads the whole predecessor output.
    pub fn is_from_all(&self) -> bool {
        self.from.is_empty()
    }

    /// Returns whether the mapping writes the whole successor input.
    pub fn is_to_all(&self) -> bool {
        self.to.is_empty()
    }

    /// Returns whether this is a whole-to-whole mapping.
    pub fn is_empty(&self) -> bool {
        self.is_from_all() && self.is_to_all()
    }

    pub(crate) fn with_from_node(mut self, from_node: &str) -> Self {
        if self.from_node != from_node {
            self.from_node = from_node.to_owned();
        }
        self
    }
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("from ")?;
        if !self.from.is_empty() {
            write!(f, "{}(field) of ", self.from)?;
        }
        write!(f, "node '{}'", self.from_node)?;
        if !self.to.is_empty() {
            write!(f, " to {}(field)", self.to)?;
        }
        Ok(())
    }
}

/// Renders a set of mappings as one human-readable string.
pub(crate) fn describe(mappings: &[FieldMapping]) -> String {
    mappings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let m = FieldMapping::to_field("a", "y");
        assert!(m.is_from_all());
        assert!(!m.is_to_all());

        let m = FieldMapping::from_field("a", "x");
        assert!(!m.is_from_all());
        assert!(m.is_to_all());

        let m = FieldMapping::map_fields("a", "x", "y");
        assert_eq!(m.source(), "x");
        assert_eq!(m.target(), "y");
        assert!(!m.is_empty());

        assert!(FieldMapping::new("a").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FieldMapping::map_fields("a", "x", "y").to_string(),
            "from x(field) of node 'a' to y(field)"
        );
        assert_eq!(FieldMapping::new("a").to_string(), "from node 'a'");
        assert_eq!(
            describe(&[FieldMapping::to_field("a", "y"), FieldMapping::from_field("b", "x")]),
            "from node 'a' to y(field); from x(field) of node 'b'"
        );
    }

    #[test]
    fn test_serialization() {
        let m = FieldMapping::to_field("a", "y");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!({ "from_node": "a", "to": "y" }));

        let back: FieldMapping = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
