//! Pull-based stream reader.

use std::io::{self, Read, StdinLock};

use jstream_core::prelude::{Row, Schema};
use tracing::debug;

use crate::error::Result;
use crate::stream::RowSource;
use crate::wire;

/// Decodes the header once at construction, then yields one row per pull.
///
/// There is no lookahead past the current row and no resynchronization: the
/// first error ends the stream for good.
pub struct StreamReader<R: Read> {
    inner: R,
    schema: Schema,
    rows_read: u64,
    done: bool,
}

impl StreamReader<StdinLock<'static>> {
    /// Open a reader on standard input.
    pub fn stdin() -> Result<Self> {
        Self::open(io::stdin().lock())
    }
}

impl<R: Read> StreamReader<R> {
    /// Block until the full header is available and decode it.
    pub fn open(mut inner: R) -> Result<Self> {
        let schema = wire::decode_header(&mut inner)?;
        debug!(
            columns = schema.len(),
            fingerprint = %schema.fingerprint().short(),
            "decoded stream header"
        );
        Ok(Self {
            inner,
            schema,
            rows_read: 0,
            done: false,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Next row, or `None` at clean end of stream.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        match wire::decode_row(&mut self.inner, &self.schema) {
            Ok(Some(row)) => {
                self.rows_read += 1;
                Ok(Some(row))
            }
            Ok(None) => {
                self.done = true;
                debug!(rows = self.rows_read, "end of input stream");
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    /// Sponge the rest of the stream into memory.
    pub fn read_all(&mut self) -> Result<Vec<Row>> {
        RowSource::drain(self)
    }
}

impl<R: Read> RowSource for StreamReader<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        StreamReader::next_row(self)
    }
}

impl<R: Read> Iterator for StreamReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
