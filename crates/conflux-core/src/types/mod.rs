//! Static type model.
//!
//! This module describes the declared shapes that flow through a graph:
//! - [`DataType`]: The declared type of a node input, output or field
//! - [`RecordType`]: A named record with ordered fields and capabilities
//! - [`InterfaceType`]: A named, open capability set
//! - [`Kind`]: The coarse shape of a type or value

mod data_type;
mod interface;
mod kind;
mod record;

pub use data_type::DataType;
pub use interface::InterfaceType;
pub use kind::Kind;
pub use record::{FieldDef, RecordType, Visibility};
