//! Aligned text tables for people.
//!
//! A table is the header row, a line of dashes spanning the summed column
//! widths, then one line per row. Every column but the last is left-justified
//! and space-padded to its width; the last column is written unpadded. In a
//! fixed-width layout a cell that fills its column still gets one space before
//! the next column; fitted layouts never overflow, so rows stay as wide as the
//! separator.

use std::io::{self, Write};

use jstream_core::prelude::{Row, Schema, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    widths: Vec<usize>,
    min_gap: usize,
}

impl TableLayout {
    /// Size each column to its widest cell (header included) plus `padding`.
    pub fn fit<'a, I>(schema: &Schema, rows: I, padding: usize) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut widths: Vec<usize> = schema.names().map(text_width).collect();
        for row in rows {
            for (w, value) in widths.iter_mut().zip(row) {
                *w = (*w).max(value_width(value));
            }
        }
        for w in widths.iter_mut() {
            *w += padding;
        }
        Self { widths, min_gap: 0 }
    }

    /// Same width for every column.
    pub fn fixed(columns: usize, width: usize) -> Self {
        Self {
            widths: vec![width; columns],
            min_gap: 1,
        }
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn total_width(&self) -> usize {
        self.widths.iter().sum()
    }

    /// Header line followed by the dash separator.
    pub fn write_header<W: Write>(&self, out: &mut W, schema: &Schema) -> io::Result<()> {
        let names: Vec<&str> = schema.names().collect();
        self.write_cells(out, &names)?;
        writeln!(out, "{}", "-".repeat(self.total_width()))
    }

    pub fn write_row<W: Write>(&self, out: &mut W, row: &[Value]) -> io::Result<()> {
        let cells: Vec<_> = row.iter().map(Value::to_text).collect();
        self.write_cells(out, &cells)
    }

    pub fn write_cells<W: Write, S: AsRef<str>>(&self, out: &mut W, cells: &[S]) -> io::Result<()> {
        let last = cells.len().saturating_sub(1);
        for (i, cell) in cells.iter().enumerate() {
            let cell = cell.as_ref();
            out.write_all(cell.as_bytes())?;
            if i == last {
                break;
            }
            let width = self.widths.get(i).copied().unwrap_or(0);
            let pad = width.saturating_sub(text_width(cell)).max(self.min_gap);
            write!(out, "{:pad$}", "", pad = pad)?;
        }
        out.write_all(b"\n")
    }
}

/// Render a fully materialized stream with a fitted layout.
pub fn render_table<W: Write>(
    out: &mut W,
    schema: &Schema,
    rows: &[Row],
    padding: usize,
) -> io::Result<()> {
    let layout = TableLayout::fit(schema, rows, padding);
    layout.write_header(out, schema)?;
    for row in rows {
        layout.write_row(out, row)?;
    }
    Ok(())
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}

fn value_width(v: &Value) -> usize {
    match v {
        Value::I64(n) => {
            let digits = n.unsigned_abs().checked_ilog10().unwrap_or(0) as usize + 1;
            digits + usize::from(*n < 0)
        }
        Value::Str(_) => text_width(&v.to_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstream_core::prelude::Column;

    fn render(schema: &Schema, rows: &[Row]) -> String {
        let mut out = Vec::new();
        render_table(&mut out, schema, rows, 2).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn widths_fit_header_and_cells() {
        let schema = Schema::new(vec![Column::string("name"), Column::i64("size")]);
        let rows = vec![
            vec![Value::from("a"), Value::I64(1234567)],
            vec![Value::from("longer-name"), Value::I64(-5)],
        ];
        let layout = TableLayout::fit(&schema, &rows, 2);
        assert_eq!(layout.widths(), &[13, 9]);
        assert_eq!(layout.total_width(), 22);
    }

    #[test]
    fn renders_aligned_table() {
        let schema = Schema::new(vec![Column::string("name"), Column::i64("size")]);
        let rows = vec![
            vec![Value::from("a"), Value::I64(10)],
            vec![Value::from("bcd"), Value::I64(2)],
        ];
        let expected = "\
name  size
------------
a     10
bcd   2
";
        assert_eq!(render(&schema, &rows), expected);
    }

    #[test]
    fn zero_padding_rows_match_separator() {
        let schema = Schema::new(vec![Column::string("ab"), Column::string("c")]);
        let rows = vec![vec![Value::from("xy"), Value::from("z")]];
        let mut out = Vec::new();
        render_table(&mut out, &schema, &rows, 0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abc\n---\nxyz\n");
    }

    #[test]
    fn empty_stream_still_has_header_and_separator() {
        let schema = Schema::new(vec![Column::string("id"), Column::string("value")]);
        assert_eq!(render(&schema, &[]), "id  value\n-----------\n");
    }

    #[test]
    fn fixed_layout_keeps_one_space_for_wide_cells() {
        let layout = TableLayout::fixed(3, 4);
        let mut out = Vec::new();
        layout
            .write_cells(&mut out, &["abcdef", "x", "last-column"])
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abcdef x   last-column\n");
    }

    #[test]
    fn number_widths() {
        assert_eq!(value_width(&Value::I64(0)), 1);
        assert_eq!(value_width(&Value::I64(9)), 1);
        assert_eq!(value_width(&Value::I64(10)), 2);
        assert_eq!(value_width(&Value::I64(-100)), 4);
        assert_eq!(
            value_width(&Value::I64(i64::MIN)),
            i64::MIN.to_string().len()
        );
    }
}
