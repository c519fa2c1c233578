//! Access error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur while reading or writing a field or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A keyed mapping has no entry for the requested key.
    KeyNotFound,
    /// A record has no field with the requested name.
    FieldNotFound,
    /// The field exists but is not readable from outside the record.
    FieldNotAccessible,
    /// The field exists but is not writable from outside the record.
    FieldNotWritable,
    /// The value is neither a record, a boxed record nor a keyed mapping.
    UnsupportedShape,
    /// The keyed mapping does not accept string keys.
    UnsupportedKeyType,
    /// The value type is not assignable to the destination type.
    TypeMismatch,
}

/// A structured error type for field and key access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", kind.as_ref(), message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Creates a new key not found error.
    pub fn key_not_found() -> Self {
        Self::new(ErrorKind::KeyNotFound)
    }

    /// Creates a new field not found error.
    pub fn field_not_found() -> Self {
        Self::new(ErrorKind::FieldNotFound)
    }

    /// Creates a new field not accessible error.
    pub fn field_not_accessible() -> Self {
        Self::new(ErrorKind::FieldNotAccessible)
    }

    /// Creates a new field not writable error.
    pub fn field_not_writable() -> Self {
        Self::new(ErrorKind::FieldNotWritable)
    }

    /// Creates a new unsupported shape error.
    pub fn unsupported_shape() -> Self {
        Self::new(ErrorKind::UnsupportedShape)
    }

    /// Creates a new unsupported key type error.
    pub fn unsupported_key_type() -> Self {
        Self::new(ErrorKind::UnsupportedKeyType)
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch() -> Self {
        Self::new(ErrorKind::TypeMismatch)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}
