#![forbid(unsafe_code)]
//! jstream: typed columnar streams between small command-line tools.
//!
//! Facade over the workspace crates:
//! - `jstream_core`: columns, schemas, values, configuration
//! - `jstream_io`: the binary wire protocol, stream reader/writer, text rendering
//! - `jstream_operators`: filter, select, sort, slice and the text line parser
//! - `jstream_exec`: runtime binding an operator to an input and an output

pub use jstream_core::prelude::{Column, ColumnType, Row, Schema, ToolConfig, Value};
pub use jstream_exec::{ExecError, PrintOptions, RunMetrics, Runtime};
pub use jstream_io::{MemorySource, Mode, RowSink, RowSource, StreamReader, StreamWriter};
pub use jstream_operators::{
    Filter, LineParser, OpError, Operator, ParseOptions, Predicate, RunStats, Select, Slice, Sort,
};
