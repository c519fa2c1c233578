#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod graph;
pub mod mapping;
pub mod stream;
pub mod workflow;

#[doc(hidden)]
pub mod prelude;

pub use error::{Error, ErrorKind, Result};
pub use graph::{END, START};
