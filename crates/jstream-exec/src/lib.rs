#![forbid(unsafe_code)]
//! jstream-exec: runs one operator between an input and an output stream.
//!
//! The runtime opens the reader, plans the operator against the decoded
//! schema, and only then opens the writer, so argument and schema errors
//! never produce output. Errors after that point discard whatever the writer
//! still holds.

pub mod metrics;
pub mod print;
pub mod runtime;

pub use metrics::{RunMetrics, RunTimer};
pub use print::PrintOptions;
pub use runtime::{ExecError, Runtime};
