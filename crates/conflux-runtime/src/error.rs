//! Composition error types.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Result type for composition operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Degenerate, duplicate or missing mappings and edges.
    Structural,
    /// A mapping that static type analysis rejects.
    StaticType,
    /// A runtime guard rejected an actual value.
    RuntimeType,
    /// Several values landed on one field without a merge policy.
    Merge,
    /// Reading or writing a field or key failed.
    Access,
    /// A node reported a failure.
    Node,
    /// An invariant established at compile time did not hold.
    Internal,
}

/// Errors that can occur while compiling or running a graph.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The graph or workflow is structurally invalid.
    #[error("invalid graph structure: {0}")]
    Structural(String),

    /// A mapping failed static type analysis.
    #[error("static check failed for mapping {mapping}: {reason}")]
    StaticType {
        /// Human-readable description of the offending mapping.
        mapping: String,
        /// Why the mapping was rejected.
        reason: String,
    },

    /// A runtime guard rejected the dynamic type of a value.
    #[error("runtime check failed for mapping {mapping}: {actual} is not assignable to {expected}")]
    RuntimeType {
        /// Human-readable description of the guarded mapping.
        mapping: String,
        /// Dynamic type of the rejected value.
        actual: String,
        /// Declared destination type.
        expected: String,
    },

    /// Multiple values target one field and cannot be merged.
    #[error("cannot merge {count} values for field '{field}' of type {ty}: {reason}")]
    Merge {
        /// Destination field name (empty for the whole input).
        field: String,
        /// Declared type of the destination field.
        ty: String,
        /// Number of values that landed on the field.
        count: usize,
        /// Why the merge failed.
        reason: String,
    },

    /// Extracting or injecting a field failed.
    #[error(transparent)]
    Access(#[from] conflux_core::Error),

    /// A node failed while executing.
    #[error("node '{node}' failed: {message}")]
    NodeFailed {
        /// Key of the failed node.
        node: String,
        /// Error message.
        message: String,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a node failure for the given node key.
    pub fn node_failed(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NodeFailed {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural(_) => ErrorKind::Structural,
            Self::StaticType { .. } => ErrorKind::StaticType,
            Self::RuntimeType { .. } => ErrorKind::RuntimeType,
            Self::Merge { .. } => ErrorKind::Merge,
            Self::Access(_) => ErrorKind::Access,
            Self::NodeFailed { .. } => ErrorKind::Node,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind().into()
    }

    /// Returns whether the error aborts graph compilation.
    ///
    /// Compile-time errors describe an invalid graph; everything else
    /// aborts a single execution.
    pub fn is_compile_time(&self) -> bool {
        matches!(self.kind(), ErrorKind::Structural | ErrorKind::StaticType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let err = Error::Structural("workflow END has no input mapping".into());
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.kind_str(), "structural");
        assert!(err.is_compile_time());

        let err = Error::node_failed("summarize", "boom");
        assert_eq!(err.to_string(), "node 'summarize' failed: boom");
        assert!(!err.is_compile_time());
    }

    #[test]
    fn test_access_error_is_transparent() {
        let err: Error = conflux_core::Error::key_not_found()
            .with_message("key=x")
            .into();
        assert_eq!(err.kind(), ErrorKind::Access);
        assert_eq!(err.to_string(), "key_not_found: key=x");
    }
}
