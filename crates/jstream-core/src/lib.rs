#![forbid(unsafe_code)]
//! jstream-core: the typed record model shared by every jstream tool.
//!
//! A stream is one `Schema` followed by any number of `Row`s. Every row holds
//! exactly one `Value` per column, and each value's tag matches the column's
//! declared `ColumnType`. Nothing in this crate performs I/O; the wire codec
//! lives in `jstream-io`.

pub mod config;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use schema::{Column, ColumnType, Schema};
pub use types::{Row, Value};

/// Version string reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
