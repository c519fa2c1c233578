//! Coarse shape of a type or value.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// The underlying shape of a [`DataType`](super::DataType) or [`Value`](crate::value::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    /// Any value at all.
    Any,
    /// The absence of a value.
    Null,
    /// Boolean scalar.
    Bool,
    /// Signed integer scalar.
    Int,
    /// Floating point scalar.
    Float,
    /// UTF-8 string scalar.
    String,
    /// Ordered sequence of values of one element type.
    List,
    /// Keyed mapping.
    Map,
    /// Structured record with named fields.
    Record,
    /// Open capability set.
    Interface,
    /// Owned indirection around another value.
    Boxed,
}
