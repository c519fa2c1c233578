//! Static assignability classification.

use conflux_core::types::DataType;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Whether values of one declared type fit where another is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Assignability {
    /// Every value of the source type fits.
    Always,
    /// No value of the source type fits.
    Never,
    /// Only some values fit; each one has to be checked at run time.
    Conditional,
}

/// Classifies a source type against a destination type.
///
/// An open source type (`Any` or an interface) is conditionally assignable to
/// any destination that satisfies it, since the concrete value it carries may
/// or may not fit. Unrelated types never are.
pub fn classify(source: &DataType, dest: &DataType) -> Assignability {
    if source.is_assignable_to(dest) {
        return Assignability::Always;
    }

    match source {
        DataType::Interface(interface) if !dest.implements(interface) => Assignability::Never,
        open if open.is_open() => Assignability::Conditional,
        _ => Assignability::Never,
    }
}
