//! Wire protocol: byte layout, reader/writer agreement, corruption handling.

use jstream::{Column, Mode, Row, Schema, StreamReader, StreamWriter, Value};
use jstream_io::{wire, Error};

fn schema() -> Schema {
    Schema::new(vec![Column::i64("pid"), Column::string("cmd")])
}

fn write_stream(schema: &Schema, rows: &[Row]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = StreamWriter::new(&mut out, schema.clone(), Mode::Machine)
            .expect("open writer");
        for row in rows {
            writer.write_row(row.clone()).expect("write row");
        }
        writer.finish().expect("finish");
    }
    out
}

#[test]
fn test_header_bytes() {
    let bytes = write_stream(&schema(), &[]);

    let mut expected = vec![0xE9, b'S', b'I', b'O'];
    expected.extend_from_slice(&2u32.to_ne_bytes());
    expected.push(1);
    expected.extend_from_slice(&3u16.to_ne_bytes());
    expected.extend_from_slice(b"pid");
    expected.push(2);
    expected.extend_from_slice(&3u16.to_ne_bytes());
    expected.extend_from_slice(b"cmd");
    assert_eq!(bytes, expected);
}

#[test]
fn test_row_bytes() {
    let header_len = write_stream(&schema(), &[]).len();
    let bytes = write_stream(&schema(), &[vec![Value::I64(-1), Value::from("")]]);

    let mut expected = vec![0xE9, b'R', b'O', b'W'];
    expected.extend_from_slice(&(-1i64).to_ne_bytes());
    expected.extend_from_slice(&0u16.to_ne_bytes());
    assert_eq!(&bytes[header_len..], &expected[..]);
}

#[test]
fn test_writer_reader_agree() {
    let rows: Vec<Row> = vec![
        vec![Value::I64(i64::MIN), Value::from("init")],
        vec![Value::I64(0), Value::from(vec![0u8, 1, 0xff, 0])],
        vec![Value::I64(i64::MAX), Value::from("x".repeat(65535))],
    ];
    let bytes = write_stream(&schema(), &rows);

    let mut reader = StreamReader::open(&bytes[..]).expect("open reader");
    assert_eq!(reader.schema(), &schema());
    assert_eq!(reader.read_all().expect("rows"), rows);
    assert_eq!(reader.rows_read(), 3);
}

#[test]
fn test_zero_column_stream() {
    let empty = Schema::new(vec![]);
    let bytes = write_stream(&empty, &[vec![], vec![]]);
    let mut reader = StreamReader::open(&bytes[..]).expect("open reader");
    assert!(reader.schema().is_empty());
    assert_eq!(reader.read_all().expect("rows").len(), 2);
}

#[test]
fn test_clean_end_yields_none_repeatedly() {
    let bytes = write_stream(&schema(), &[vec![Value::I64(1), Value::from("a")]]);
    let mut reader = StreamReader::open(&bytes[..]).expect("open reader");
    assert!(reader.next_row().expect("row").is_some());
    assert!(reader.next_row().expect("end").is_none());
    assert!(reader.next_row().expect("still end").is_none());
}

#[test]
fn test_corruption_is_fatal() {
    let good = write_stream(&schema(), &[vec![Value::I64(1), Value::from("abc")]]);

    // Every proper prefix that cuts into the row is truncation.
    let header_len = write_stream(&schema(), &[]).len();
    for cut in header_len + 1..good.len() {
        let mut reader = StreamReader::open(&good[..cut]).expect("header intact");
        let err = reader.next_row().expect_err("truncated row");
        assert!(err.is_corruption(), "cut at {cut}: {err}");
    }

    // Cutting into the header fails at open.
    for cut in 0..header_len {
        let err = StreamReader::open(&good[..cut]).err().expect("truncated header");
        assert!(matches!(err, Error::Truncated(_)), "cut at {cut}: {err}");
    }

    let mut bad_row = good.clone();
    bad_row[header_len] = b'X';
    let mut reader = StreamReader::open(&bad_row[..]).expect("header intact");
    assert!(matches!(
        reader.next_row(),
        Err(Error::BadMagic { what: "row", .. })
    ));
    // No resynchronization after the first error.
    assert!(reader.next_row().expect("done").is_none());
}

#[test]
fn test_unknown_type_tag_is_rejected() {
    let mut bytes = write_stream(&schema(), &[]);
    // First column tag sits right after magic and count.
    bytes[8] = 7;
    assert!(matches!(
        StreamReader::open(&bytes[..]),
        Err(Error::InvalidColumnType(7))
    ));
    bytes[8] = 0;
    assert!(matches!(
        StreamReader::open(&bytes[..]),
        Err(Error::InvalidColumnType(0))
    ));
}

#[test]
fn test_writer_refuses_bad_rows() {
    let mut out = Vec::new();
    let mut writer = StreamWriter::new(&mut out, schema(), Mode::Machine).expect("open writer");

    assert!(writer
        .write_row(vec![Value::from("1"), Value::from("a")])
        .is_err());
    assert!(writer.write_row(vec![Value::I64(1)]).is_err());
    let err = writer
        .write_row(vec![Value::I64(1), Value::from(vec![b'x'; 65536])])
        .expect_err("too long");
    assert!(matches!(err, Error::TooLong { len: 65536, .. }));

    writer.write_row(vec![Value::I64(2), Value::from("ok")]).expect("good row");
    writer.finish().expect("finish");
    drop(writer);

    // Refused rows left nothing behind.
    let rows = StreamReader::open(&out[..]).expect("reader").read_all().expect("rows");
    assert_eq!(rows, vec![vec![Value::I64(2), Value::from("ok")]]);
}

#[test]
fn test_invalid_schema_cannot_be_written() {
    let bad = Schema::new(vec![Column::new("x", jstream::ColumnType::Invalid)]);
    assert!(StreamWriter::new(Vec::new(), bad.clone(), Mode::Machine).is_err());
    assert!(wire::encode_header(&bad, &mut Vec::new()).is_err());
}
