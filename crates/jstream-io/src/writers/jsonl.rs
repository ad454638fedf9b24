//! Streaming NDJSON writer.

use std::io::{BufWriter, Write};

use jstream_core::prelude::{Schema, Value};

use crate::error::Result;

/// One JSON object per row, keys in schema order.
///
/// Objects are assembled by hand so that column order and repeated column
/// names survive; a map type would sort or collapse them.
pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    keys: Vec<String>,
    line: String,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W, schema: &Schema) -> Result<Self> {
        let keys = schema
            .names()
            .map(|name| serde_json::to_string(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            writer: BufWriter::new(writer),
            keys,
            line: String::new(),
        })
    }

    /// Write one row and flush it.
    pub fn write_row(&mut self, row: &[Value]) -> Result<()> {
        self.line.clear();
        self.line.push('{');
        for (i, (key, value)) in self.keys.iter().zip(row).enumerate() {
            if i > 0 {
                self.line.push(',');
            }
            self.line.push_str(key);
            self.line.push(':');
            self.line.push_str(&serde_json::to_string(&value_to_json(value))?);
        }
        self.line.push('}');
        writeln!(self.writer, "{}", self.line)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::I64(i) => serde_json::Value::from(*i),
        Value::Str(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}
