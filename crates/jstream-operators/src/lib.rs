#![forbid(unsafe_code)]
//! jstream-operators: stream operators built on the jstream protocol.
//!
//! Design intent:
//! - Pure and synchronous; one row at a time from a `RowSource` into a `RowSink`.
//! - `plan` validates everything against the input schema before any output
//!   exists, so configuration errors never leave a half-written stream.
//! - Filter and Select stream. Sort and Slice materialize the whole input
//!   first; their semantics depend on seeing every row.

pub mod expr;
pub mod filter;
pub mod parse;
pub mod plan;
pub mod select;
pub mod slice;
pub mod sort;
pub mod traits;

pub use expr::Predicate;
pub use filter::Filter;
pub use parse::{LineParser, ParseOptions};
pub use plan::{Footprint, OpPlan};
pub use select::Select;
pub use slice::Slice;
pub use sort::Sort;
pub use traits::{stream_exit_code, OpError, Operator, RunStats};
