//! Line-oriented text → stream rows.
//!
//! Unlike the other operators this one has no input schema: it reads raw bytes,
//! cuts them into records at a (possibly multi-byte) delimiter and turns every
//! record into a row of String values, either by splitting on a field
//! delimiter or by matching a regex whose capture groups become the values.

use std::io::{self, Read};

use jstream_core::prelude::{Column, Row, Schema, Value};
use jstream_io::RowSink;
use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::traits::{OpError, RunStats};

const READ_CHUNK: usize = 8 * 1024;
const TRIM_BYTES: &[u8] = b" \x0c\n\r\t\x0b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub columns: Vec<String>,
    pub csv: Option<String>,
    pub regex: Option<String>,
    pub trim: bool,
    pub row_delimiter: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            csv: None,
            regex: None,
            trim: false,
            row_delimiter: "\n".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum LineFormat {
    /// Split into at most one part per column; the remainder stays in the last.
    Split { delimiter: Vec<u8>, trim: bool },
    /// Whole-record match, one capture group per column.
    Regex(Regex),
}

#[derive(Debug, Clone)]
pub struct LineParser {
    schema: Schema,
    format: LineFormat,
    row_delimiter: Vec<u8>,
}

impl LineParser {
    pub fn from_options(opts: &ParseOptions) -> Result<Self, OpError> {
        if opts.columns.is_empty() {
            return Err(OpError::InvalidArgument(
                "at least one column name is required".into(),
            ));
        }
        if opts.row_delimiter.is_empty() {
            return Err(OpError::InvalidArgument(
                "row delimiter must not be empty".into(),
            ));
        }

        let format = match (&opts.csv, &opts.regex) {
            (Some(delim), None) => {
                if delim.is_empty() {
                    return Err(OpError::InvalidArgument(
                        "field delimiter must not be empty".into(),
                    ));
                }
                LineFormat::Split {
                    delimiter: delim.as_bytes().to_vec(),
                    trim: opts.trim,
                }
            }
            (None, Some(pattern)) => {
                if opts.trim {
                    warn!("--trim only applies to --csv; ignoring");
                }
                // Validate the user's pattern on its own before anchoring it.
                Regex::new(pattern)?;
                let regex = Regex::new(&format!(r"\A(?:{pattern})\z"))?;
                let groups = regex.captures_len() - 1;
                if groups != opts.columns.len() {
                    return Err(OpError::InvalidArgument(format!(
                        "pattern has {groups} capture group(s) but {} column(s) were named",
                        opts.columns.len()
                    )));
                }
                LineFormat::Regex(regex)
            }
            _ => {
                return Err(OpError::InvalidArgument(
                    "pass exactly one of --csv or --regex".into(),
                ))
            }
        };

        Ok(Self {
            schema: Schema::new(opts.columns.iter().map(Column::string).collect()),
            format,
            row_delimiter: opts.row_delimiter.as_bytes().to_vec(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Turn one record (delimiter already stripped) into a row.
    pub fn parse_line(&self, line: &[u8]) -> Result<Row, OpError> {
        let n = self.schema.len();
        match &self.format {
            LineFormat::Split { delimiter, trim } => {
                let mut parts = split_n(line, delimiter, n);
                parts.resize(n, &b""[..]);
                Ok(parts
                    .into_iter()
                    .map(|p| Value::from(if *trim { trim_ascii(p) } else { p }))
                    .collect())
            }
            LineFormat::Regex(regex) => {
                let caps = regex.captures(line).ok_or_else(|| {
                    OpError::InvalidInput(format!(
                        "record does not match pattern: {}",
                        String::from_utf8_lossy(line)
                    ))
                })?;
                Ok(caps
                    .iter()
                    .skip(1)
                    .map(|m| Value::from(m.map(|m| m.as_bytes()).unwrap_or_default()))
                    .collect())
            }
        }
    }

    /// Read `input` to the end, pushing one row per record.
    ///
    /// A trailing record without a final delimiter is still emitted; an empty
    /// tail after the last delimiter is not.
    pub fn run<R: Read>(
        &self,
        mut input: R,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError> {
        let delim = self.row_delimiter.as_slice();
        let mut pending: Vec<u8> = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut scan_from = 0;
        let mut stats = RunStats::default();

        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(jstream_io::Error::from(e).into()),
            };
            pending.extend_from_slice(&chunk[..n]);

            let mut start = 0;
            while let Some(pos) = find(&pending[scan_from..], delim) {
                let end = scan_from + pos;
                self.emit(&pending[start..end], output, &mut stats)?;
                start = end + delim.len();
                scan_from = start;
            }
            pending.drain(..start);
            // A delimiter may straddle the next chunk boundary.
            scan_from = pending.len().saturating_sub(delim.len() - 1);
        }

        if !pending.is_empty() {
            self.emit(&pending, output, &mut stats)?;
        }
        debug!(records = stats.rows_in, "parse finished");
        Ok(stats)
    }

    fn emit(
        &self,
        record: &[u8],
        output: &mut dyn RowSink,
        stats: &mut RunStats,
    ) -> Result<(), OpError> {
        stats.rows_in += 1;
        let row = self.parse_line(record)?;
        output.push_row(row)?;
        stats.rows_out += 1;
        Ok(())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split at `delim` into at most `max` parts.
fn split_n<'a>(line: &'a [u8], delim: &[u8], max: usize) -> Vec<&'a [u8]> {
    let mut parts = Vec::with_capacity(max);
    let mut rest = line;
    while parts.len() + 1 < max {
        match find(rest, delim) {
            Some(pos) => {
                parts.push(&rest[..pos]);
                rest = &rest[pos + delim.len()..];
            }
            None => break,
        }
    }
    parts.push(rest);
    parts
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !TRIM_BYTES.contains(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !TRIM_BYTES.contains(b))
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
