//! Convenient re-exports for downstream crates.

pub use crate::config::ToolConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::schema::{Column, ColumnType, Schema};
pub use crate::types::{Row, Value};
