//! Field mapping engine.
//!
//! An edge may route a named field or key of its predecessor's output into a
//! named field or key of its successor's input instead of passing the whole
//! value. This module covers both phases of such edges:
//!
//! - At compile time, [`validate_field_mapping`] resolves every mapping to a
//!   pair of declared field types and classifies it with [`classify`]. The
//!   result is a serializable [`GuardPlan`] holding one [`TypeGuard`] for
//!   every pairing that can only be decided at run time.
//! - At run time, [`field_map`] extracts the mapped fields of each
//!   predecessor output, the guard plan checks them, and a
//!   [`ValueConverter`] merges and injects them into a fresh successor input.

mod assignable;
mod convert;
mod descriptor;
mod extract;
mod guard;
mod handler;
mod inject;
mod merge;
mod validate;

pub use assignable::{Assignability, classify};
pub use convert::{FieldValues, ValueConverter, gather};
pub use descriptor::FieldMapping;
pub use extract::{FieldMap, field_map, take_one};
pub use guard::{GuardPlan, TypeGuard};
pub use handler::HandlerPair;
pub use inject::assign_one;
pub use merge::{MergeFn, MergeRegistry, merge_conflict};
pub use validate::{validate_edge, validate_field_mapping};

pub(crate) use descriptor::describe;

/// Tracing target for mapping validation and runtime guards.
pub const TRACING_TARGET: &str = "conflux_runtime::mapping";
