//! Runtime: bind an operator to a byte input and a byte output.
//!
//! Order of work for every run:
//! 1. decode the input header (blocks until it is complete),
//! 2. `plan` the operator against it; configuration errors stop here,
//! 3. open the writer with the planned output schema,
//! 4. drive rows, then finish the writer, or discard it on error.

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::debug_span;

use jstream_core::config::ToolConfig;
use jstream_io::{Mode, StreamReader, StreamWriter};
use jstream_operators::traits::stream_exit_code;
use jstream_operators::{LineParser, OpError, Operator, RunStats};

use crate::metrics::{RunMetrics, RunTimer};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Operator(#[from] OpError),

    #[error(transparent)]
    Stream(#[from] jstream_io::Error),
}

impl ExecError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::Operator(e) => e.exit_code(),
            ExecError::Stream(e) => stream_exit_code(e),
        }
    }

    /// The consumer closed its end of the pipe.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            ExecError::Operator(OpError::Stream(e)) | ExecError::Stream(e) => e.is_broken_pipe(),
            ExecError::Operator(_) => false,
        }
    }
}

/// Runtime owns the tool configuration.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    cfg: ToolConfig,
}

impl Runtime {
    pub fn new(cfg: ToolConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.cfg
    }

    /// Run `op` from `input` into `output` in the given writer mode.
    pub fn run_operator<R: Read, W: Write>(
        &self,
        op: &dyn Operator,
        input: R,
        output: W,
        mode: Mode,
    ) -> Result<RunMetrics, ExecError> {
        let span = debug_span!("run", op = op.name());
        let _guard = span.enter();

        let timer = RunTimer::start(op.name());
        let mut reader = StreamReader::open(input)?;
        let plan = op.plan(reader.schema())?;
        tracing::debug!(footprint = ?plan.footprint, "planned");

        let writer =
            StreamWriter::with_padding(output, plan.output_schema, mode, self.cfg.table_padding)?;
        let stats = drive(writer, |w| op.run(&mut reader, w))?;
        Ok(timer.stop(stats))
    }

    /// Run the text line parser from `input` into `output`.
    pub fn run_parser<R: Read, W: Write>(
        &self,
        parser: &LineParser,
        input: R,
        output: W,
        mode: Mode,
    ) -> Result<RunMetrics, ExecError> {
        let span = debug_span!("run", op = "parse");
        let _guard = span.enter();

        let timer = RunTimer::start("parse");
        let writer = StreamWriter::with_padding(
            output,
            parser.schema().clone(),
            mode,
            self.cfg.table_padding,
        )?;
        let stats = drive(writer, |w| parser.run(input, w))?;
        Ok(timer.stop(stats))
    }

    /// `run_operator` on stdin/stdout, human mode when stdout is a terminal.
    pub fn run_operator_stdio(&self, op: &dyn Operator) -> Result<RunMetrics, ExecError> {
        let out = io::stdout();
        let mode = Mode::detect(&out);
        self.run_operator(op, io::stdin().lock(), out.lock(), mode)
    }

    pub fn run_parser_stdio(&self, parser: &LineParser) -> Result<RunMetrics, ExecError> {
        let out = io::stdout();
        let mode = Mode::detect(&out);
        self.run_parser(parser, io::stdin().lock(), out.lock(), mode)
    }
}

/// Push rows through `f`, then finish the writer; on failure discard it so
/// no partial table is rendered.
fn drive<W, F>(mut writer: StreamWriter<W>, f: F) -> Result<RunStats, ExecError>
where
    W: Write,
    F: FnOnce(&mut StreamWriter<W>) -> Result<RunStats, OpError>,
{
    match f(&mut writer) {
        Ok(stats) => {
            writer.finish()?;
            Ok(stats)
        }
        Err(e) => {
            writer.discard();
            Err(e.into())
        }
    }
}
