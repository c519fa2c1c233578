//! Dynamic value model.
//!
//! Values carry their own dynamic type, so a value held behind an open
//! declared type (`Any` or an interface) can still be checked at run time.
//! Field and key access goes exclusively through [`FieldAccess`].

mod access;
mod list;
mod map;
mod record;
#[allow(clippy::module_inception)]
mod value;

pub use access::FieldAccess;
pub use list::List;
pub use map::{Map, MapKey};
pub use record::Record;
pub use value::Value;
