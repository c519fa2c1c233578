//! Convenient re-exports for common use.

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::types::{DataType, FieldDef, InterfaceType, Kind, RecordType, Visibility};
pub use crate::value::{FieldAccess, List, Map, MapKey, Record, Value};
