//! Row source/sink seams.
//!
//! Operators pull from a `RowSource` and push into a `RowSink`. The stream
//! reader/writer implement them for real pipes; `MemorySource` and `Vec<Row>`
//! implement them for in-process use.

use std::collections::VecDeque;

use jstream_core::prelude::{Row, Schema};

use crate::error::Result;

pub trait RowSource {
    fn schema(&self) -> &Schema;

    /// Pull the next row; `None` once the stream has ended.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Materialize every remaining row.
    fn drain(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

pub trait RowSink {
    fn push_row(&mut self, row: Row) -> Result<()>;
}

impl RowSink for Vec<Row> {
    fn push_row(&mut self, row: Row) -> Result<()> {
        self.push(row);
        Ok(())
    }
}

/// In-memory stream with a fixed schema.
#[derive(Debug, Clone)]
pub struct MemorySource {
    schema: Schema,
    rows: VecDeque<Row>,
}

impl MemorySource {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows: rows.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemorySource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
