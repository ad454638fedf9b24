//! Byte-exact stream codec.
//!
//! Layout:
//! [ magic: E9 'S' 'I' 'O' ][ column_count: u32 ]
//! column_count x [ type: u8 ][ name_len: u16 ][ name bytes ]
//!
//! Each row:
//! [ marker: E9 'R' 'O' 'W' ] then per column in schema order
//!   I64    -> [ value: i64 ]
//!   String -> [ len: u16 ][ bytes ]
//!
//! Integers use the host's native byte order, which is what existing producers
//! emit. The row marker is a sentinel, not a length prefix: a row's size is
//! only known after decoding every column.

use std::io::{ErrorKind, Read};

use jstream_core::prelude::{Column, ColumnType, Row, Schema, Value};

use crate::error::{Error, Result};

pub const MAGIC_LEN: usize = 4;
pub const STREAM_MAGIC: [u8; MAGIC_LEN] = [0xE9, b'S', b'I', b'O'];
pub const ROW_MAGIC: [u8; MAGIC_LEN] = [0xE9, b'R', b'O', b'W'];

/// Longest column name or string value a 16-bit length can describe.
pub const MAX_STR_LEN: usize = u16::MAX as usize;

/// Append the stream header for `schema` to `out`.
pub fn encode_header(schema: &Schema, out: &mut Vec<u8>) -> Result<()> {
    schema.validate()?;
    let count = u32::try_from(schema.len()).map_err(|_| Error::TooLong {
        what: "column count".into(),
        len: schema.len(),
        max: u32::MAX as usize,
    })?;
    out.extend_from_slice(&STREAM_MAGIC);
    out.extend_from_slice(&count.to_ne_bytes());
    for col in &schema.columns {
        out.push(col.column_type.tag());
        put_str(out, col.name.as_bytes(), || format!("column name '{}'", col.name))?;
    }
    Ok(())
}

/// Append one framed row to `out`. The row must satisfy `schema`.
///
/// On error `out` may hold a partial frame; callers discard it.
pub fn encode_row(schema: &Schema, row: &[Value], out: &mut Vec<u8>) -> Result<()> {
    schema.check_row(row)?;
    out.extend_from_slice(&ROW_MAGIC);
    for (col, value) in schema.columns.iter().zip(row) {
        match value {
            Value::I64(v) => out.extend_from_slice(&v.to_ne_bytes()),
            Value::Str(bytes) => {
                put_str(out, bytes, || format!("value of column '{}'", col.name))?
            }
        }
    }
    Ok(())
}

fn put_str<F>(out: &mut Vec<u8>, bytes: &[u8], what: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    let len = u16::try_from(bytes.len()).map_err(|_| Error::TooLong {
        what: what(),
        len: bytes.len(),
        max: MAX_STR_LEN,
    })?;
    out.extend_from_slice(&len.to_ne_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Read and decode a full stream header. Blocks until it is available.
pub fn decode_header<R: Read>(r: &mut R) -> Result<Schema> {
    let magic: [u8; MAGIC_LEN] = read_array(r, "stream header")?;
    if magic != STREAM_MAGIC {
        return Err(Error::BadMagic {
            what: "stream header",
            found: magic,
        });
    }
    let count = u32::from_ne_bytes(read_array(r, "column count")?);

    // The count is untrusted until every column has been read.
    let mut columns = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let [tag] = read_array::<_, 1>(r, "column type")?;
        let column_type = match ColumnType::from_u8(tag) {
            Some(ColumnType::Invalid) | None => return Err(Error::InvalidColumnType(tag)),
            Some(t) => t,
        };
        let name = String::from_utf8(read_str(r, "column name")?)
            .map_err(|e| Error::InvalidName(e.into_bytes()))?;
        columns.push(Column::new(name, column_type));
    }
    Ok(Schema::new(columns))
}

/// Decode the next row. `Ok(None)` means the source ended cleanly exactly
/// where a row marker was expected.
pub fn decode_row<R: Read>(r: &mut R, schema: &Schema) -> Result<Option<Row>> {
    let mut marker = [0u8; MAGIC_LEN];
    if !read_marker(r, &mut marker)? {
        return Ok(None);
    }
    if marker != ROW_MAGIC {
        return Err(Error::BadMagic {
            what: "row",
            found: marker,
        });
    }

    let mut row = Vec::with_capacity(schema.len());
    for col in &schema.columns {
        let value = match col.column_type {
            ColumnType::I64 => Value::I64(i64::from_ne_bytes(read_array(r, "i64 value")?)),
            ColumnType::String => Value::Str(read_str(r, "string value")?),
            ColumnType::Invalid => return Err(Error::InvalidColumnType(col.column_type.tag())),
        };
        row.push(value);
    }
    Ok(Some(row))
}

/// Fill `buf` completely. Returns `false` if the source was at EOF before the
/// first byte; EOF after a partial marker is truncation.
fn read_marker<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(Error::Truncated("row marker")),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], context: &'static str) -> Result<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::Truncated(context)
        } else {
            Error::Io(e)
        }
    })
}

fn read_array<R: Read, const N: usize>(r: &mut R, context: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact(r, &mut buf, context)?;
    Ok(buf)
}

fn read_str<R: Read>(r: &mut R, context: &'static str) -> Result<Vec<u8>> {
    let len = u16::from_ne_bytes(read_array(r, context)?) as usize;
    let mut buf = vec![0u8; len];
    read_exact(r, &mut buf, context)?;
    Ok(buf)
}
