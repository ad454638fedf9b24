//! Stream writer with machine and human modes.

use std::io::{self, BufWriter, IsTerminal, Stdout, Write};

use jstream_core::prelude::{Row, Schema, ToolConfig};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::stream::RowSink;
use crate::wire;

use super::table::render_table;

/// How a writer emits its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Binary wire format; header at open, each row flushed as it arrives.
    Machine,
    /// Everything deferred; rows are buffered and rendered as a table on finish.
    Human,
}

impl Mode {
    /// Human mode iff the destination is an interactive terminal.
    pub fn detect<T: IsTerminal>(dest: &T) -> Self {
        if dest.is_terminal() {
            Mode::Human
        } else {
            Mode::Machine
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finished,
    Discarded,
}

/// Writes one stream: a schema, then rows matching it.
///
/// In machine mode the header is written by the constructor and nothing is
/// held in memory. In human mode nothing at all is written until `finish`.
/// Dropping an open writer finishes it; call `discard` after a fatal error to
/// suppress any output that is still pending.
pub struct StreamWriter<W: Write> {
    inner: W,
    schema: Schema,
    mode: Mode,
    padding: usize,
    buffered: Vec<Row>,
    scratch: Vec<u8>,
    rows_written: u64,
    state: State,
}

impl StreamWriter<Stdout> {
    /// Open a writer on standard output, choosing the mode from whether it is
    /// a terminal.
    pub fn stdout(schema: Schema, cfg: &ToolConfig) -> Result<Self> {
        let out = io::stdout();
        let mode = Mode::detect(&out);
        Self::with_padding(out, schema, mode, cfg.table_padding)
    }
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W, schema: Schema, mode: Mode) -> Result<Self> {
        Self::with_padding(inner, schema, mode, ToolConfig::default().table_padding)
    }

    pub fn with_padding(inner: W, schema: Schema, mode: Mode, padding: usize) -> Result<Self> {
        schema.validate()?;
        let mut writer = Self {
            inner,
            schema,
            mode,
            padding,
            buffered: Vec::new(),
            scratch: Vec::new(),
            rows_written: 0,
            state: State::Open,
        };
        debug!(
            mode = ?mode,
            columns = writer.schema.len(),
            fingerprint = %writer.schema.fingerprint().short(),
            "opened stream writer"
        );
        if mode == Mode::Machine {
            wire::encode_header(&writer.schema, &mut writer.scratch)?;
            writer.flush_scratch()?;
        }
        Ok(writer)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Emit one row. The row must match the schema.
    pub fn write_row(&mut self, row: Row) -> Result<()> {
        if self.state != State::Open {
            return Err(Error::Finished);
        }
        match self.mode {
            Mode::Machine => {
                self.scratch.clear();
                if let Err(e) = wire::encode_row(&self.schema, &row, &mut self.scratch) {
                    warn!(error = %e, "refusing row");
                    self.scratch.clear();
                    return Err(e);
                }
                self.flush_scratch()?;
            }
            Mode::Human => {
                if let Err(e) = self.schema.check_row(&row) {
                    warn!(error = %e, "refusing row");
                    return Err(e.into());
                }
                self.buffered.push(row);
            }
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Complete the stream. Human mode renders the buffered table here.
    /// Calling it again is a no-op.
    pub fn finish(&mut self) -> Result<()> {
        if self.state != State::Open {
            return Ok(());
        }
        self.state = State::Finished;
        match self.mode {
            Mode::Machine => self.inner.flush()?,
            Mode::Human => {
                let rows = std::mem::take(&mut self.buffered);
                let mut out = BufWriter::new(&mut self.inner);
                render_table(&mut out, &self.schema, &rows, self.padding)?;
                out.flush()?;
            }
        }
        debug!(rows = self.rows_written, mode = ?self.mode, "stream finished");
        Ok(())
    }

    /// Abandon the stream without emitting anything still pending.
    pub fn discard(&mut self) {
        if self.state == State::Open {
            self.state = State::Discarded;
            self.buffered.clear();
        }
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.inner.write_all(&self.scratch)?;
        self.inner.flush()?;
        self.scratch.clear();
        Ok(())
    }
}

impl<W: Write> RowSink for StreamWriter<W> {
    fn push_row(&mut self, row: Row) -> Result<()> {
        self.write_row(row)
    }
}

impl<W: Write> Drop for StreamWriter<W> {
    fn drop(&mut self) {
        if self.state == State::Open && !std::thread::panicking() {
            if let Err(e) = self.finish() {
                warn!(error = %e, "failed to finish stream on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::StreamReader;
    use jstream_core::prelude::{Column, Value};

    fn schema() -> Schema {
        Schema::new(vec![Column::string("name"), Column::i64("size")])
    }

    #[test]
    fn machine_mode_writes_header_eagerly() {
        let writer = StreamWriter::new(Vec::new(), schema(), Mode::Machine).unwrap();
        let mut expected = Vec::new();
        wire::encode_header(&schema(), &mut expected).unwrap();
        assert_eq!(writer.get_ref(), &expected);
    }

    #[test]
    fn machine_mode_streams_rows() {
        let mut writer = StreamWriter::new(Vec::new(), schema(), Mode::Machine).unwrap();
        let header_len = writer.get_ref().len();
        writer
            .write_row(vec![Value::from("a"), Value::I64(1)])
            .unwrap();
        assert!(writer.get_ref().len() > header_len);
        writer.finish().unwrap();

        let reader = StreamReader::open(&writer.get_ref()[..]).unwrap();
        let rows: Vec<Row> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![vec![Value::from("a"), Value::I64(1)]]);
    }

    #[test]
    fn human_mode_defers_everything() {
        let mut writer = StreamWriter::new(Vec::new(), schema(), Mode::Human).unwrap();
        writer
            .write_row(vec![Value::from("alpha"), Value::I64(3)])
            .unwrap();
        assert!(writer.get_ref().is_empty());
        writer.finish().unwrap();
        let text = String::from_utf8(writer.get_ref().clone()).unwrap();
        assert_eq!(text, "name   size\n-------------\nalpha  3\n");
    }

    #[test]
    fn human_mode_empty_stream_renders_header() {
        let mut writer = StreamWriter::new(Vec::new(), schema(), Mode::Human).unwrap();
        writer.finish().unwrap();
        let text = String::from_utf8(writer.get_ref().clone()).unwrap();
        assert_eq!(text, "name  size\n------------\n");
    }

    #[test]
    fn mismatched_rows_are_refused_in_both_modes() {
        for mode in [Mode::Machine, Mode::Human] {
            let mut writer = StreamWriter::new(Vec::new(), schema(), mode).unwrap();
            let before = writer.get_ref().len();
            assert!(writer.write_row(vec![Value::I64(1), Value::I64(2)]).is_err());
            assert!(writer.write_row(vec![Value::from("x")]).is_err());
            assert_eq!(writer.get_ref().len(), before);
            assert_eq!(writer.rows_written(), 0);
        }
    }

    #[test]
    fn finish_is_idempotent_and_closes_the_stream() {
        let mut writer = StreamWriter::new(Vec::new(), schema(), Mode::Human).unwrap();
        writer.finish().unwrap();
        let len = writer.get_ref().len();
        writer.finish().unwrap();
        assert_eq!(writer.get_ref().len(), len);
        assert!(matches!(
            writer.write_row(vec![Value::from("a"), Value::I64(1)]),
            Err(Error::Finished)
        ));
    }

    #[test]
    fn discard_suppresses_pending_table() {
        let mut writer = StreamWriter::new(Vec::new(), schema(), Mode::Human).unwrap();
        writer
            .write_row(vec![Value::from("a"), Value::I64(1)])
            .unwrap();
        writer.discard();
        writer.finish().unwrap();
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn invalid_schema_is_rejected() {
        let bad = Schema::new(vec![Column::new("x", jstream_core::ColumnType::Invalid)]);
        assert!(StreamWriter::new(Vec::new(), bad, Mode::Machine).is_err());
    }
}
