#![forbid(unsafe_code)]
//! jstream-io: the structured stream protocol.
//!
//! - `wire`: byte-exact header/row codec.
//! - `readers::StreamReader`: decodes the header once, then pulls rows.
//! - `writers::StreamWriter`: machine mode (binary, flushed per row) or human
//!   mode (buffered, rendered as a table when the stream finishes).
//! - `stream`: the `RowSource`/`RowSink` seams operators are written against.

pub mod error;
pub mod readers;
pub mod stream;
pub mod wire;
pub mod writers;

pub use error::{Error, Result};
pub use readers::StreamReader;
pub use stream::{MemorySource, RowSink, RowSource};
pub use writers::{JsonlWriter, Mode, StreamWriter, TableLayout};
