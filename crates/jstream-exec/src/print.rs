//! Text rendering sink: always writes text, whatever stdout is.

use std::io::{self, BufWriter, Read, Write};

use tracing::debug_span;

use jstream_io::{JsonlWriter, StreamReader, TableLayout};
use jstream_operators::RunStats;

use crate::metrics::{RunMetrics, RunTimer};
use crate::runtime::{ExecError, Runtime};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Read the whole stream first and fit the columns to the data.
    pub sponge: bool,
    /// Fixed width for every column. Overrides fitting.
    pub col_width: Option<usize>,
    /// One JSON object per row instead of a table.
    pub json: bool,
}

impl Runtime {
    pub fn print<R: Read, W: Write>(
        &self,
        opts: &PrintOptions,
        input: R,
        output: W,
    ) -> Result<RunMetrics, ExecError> {
        let span = debug_span!("run", op = "print");
        let _guard = span.enter();

        let timer = RunTimer::start("print");
        let mut reader = StreamReader::open(input)?;
        let stats = if opts.json {
            print_json(&mut reader, output)?
        } else if opts.sponge {
            self.print_fitted(&mut reader, opts.col_width, output)?
        } else {
            let width = opts.col_width.unwrap_or(self.config().print_col_width);
            print_streaming(&mut reader, width, output)?
        };
        Ok(timer.stop(stats))
    }

    pub fn print_stdio(&self, opts: &PrintOptions) -> Result<RunMetrics, ExecError> {
        self.print(opts, io::stdin().lock(), io::stdout().lock())
    }

    fn print_fitted<R: Read, W: Write>(
        &self,
        reader: &mut StreamReader<R>,
        col_width: Option<usize>,
        output: W,
    ) -> Result<RunStats, ExecError> {
        let rows = reader.read_all()?;
        let schema = reader.schema();
        let layout = match col_width {
            Some(w) => TableLayout::fixed(schema.len(), w),
            None => TableLayout::fit(schema, &rows, self.config().table_padding),
        };

        let mut out = BufWriter::new(output);
        layout.write_header(&mut out, schema).map_err(io_err)?;
        for row in &rows {
            layout.write_row(&mut out, row).map_err(io_err)?;
        }
        out.flush().map_err(io_err)?;

        let n = rows.len() as u64;
        Ok(RunStats {
            rows_in: n,
            rows_out: n,
        })
    }
}

/// Rows go out as they arrive, one flush per line.
fn print_streaming<R: Read, W: Write>(
    reader: &mut StreamReader<R>,
    width: usize,
    mut output: W,
) -> Result<RunStats, ExecError> {
    let layout = TableLayout::fixed(reader.schema().len(), width);
    layout
        .write_header(&mut output, reader.schema())
        .and_then(|()| output.flush())
        .map_err(io_err)?;

    let mut stats = RunStats::default();
    while let Some(row) = reader.next_row()? {
        stats.rows_in += 1;
        layout
            .write_row(&mut output, &row)
            .and_then(|()| output.flush())
            .map_err(io_err)?;
        stats.rows_out += 1;
    }
    Ok(stats)
}

fn print_json<R: Read, W: Write>(
    reader: &mut StreamReader<R>,
    output: W,
) -> Result<RunStats, ExecError> {
    let mut writer = JsonlWriter::new(output, reader.schema())?;
    let mut stats = RunStats::default();
    while let Some(row) = reader.next_row()? {
        stats.rows_in += 1;
        writer.write_row(&row)?;
        stats.rows_out += 1;
    }
    writer.into_inner()?;
    Ok(stats)
}

fn io_err(e: io::Error) -> ExecError {
    ExecError::Stream(e.into())
}
