//! Decoded rows and the raw-row decoder

use std::sync::Arc;

use bytes::Bytes;

use crate::buffer::ReadBuffer;
use crate::codec::decode_column;
use crate::error::Result;
use crate::statement::ColumnInfo;
use crate::value::Value;

/// One decoded row: values in column order, one per column descriptor
///
/// # Example
///
/// ```rust
/// use orawire::{Row, Value};
///
/// let row = Row::new(
///     vec![Value::Integer(1), Value::String("Alice".into())],
///     vec!["ID".to_string(), "NAME".to_string()],
/// );
/// assert_eq!(row.get_i64(0), Some(1));
/// assert_eq!(row.get_by_name("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<Value>,
    column_names: Arc<[String]>,
}

impl Row {
    /// Create a row from values and column names
    pub fn new(values: Vec<Value>, column_names: impl Into<Arc<[String]>>) -> Self {
        Self {
            values,
            column_names: column_names.into(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by 0-based column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let index = self
            .column_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))?;
        self.values.get(index)
    }

    /// All values as a slice
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the row, returning the values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Try to get a string by index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }

    /// Try to get an integer by index
    pub fn get_i64(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(Value::as_i64)
    }

    /// Try to get a float by index
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Value::as_f64)
    }

    /// Check if a column value is NULL
    pub fn is_null(&self, index: usize) -> bool {
        self.get(index).map(Value::is_null).unwrap_or(true)
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }
}

impl std::ops::Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

/// Decoder turning raw fetched row buffers into [`Row`]s
///
/// One decoder serves every row of a statement execution; the column list
/// is immutable and shared. Columns decode in ascending ordinal order, and
/// a failure on any column fails the whole row (no partial rows).
#[derive(Debug)]
pub struct RowDecoder {
    columns: Arc<[ColumnInfo]>,
    column_names: Arc<[String]>,
}

impl RowDecoder {
    /// Create a decoder over a statement's column list
    pub fn new(columns: Arc<[ColumnInfo]>) -> Self {
        let column_names: Arc<[String]> =
            columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>().into();
        Self {
            columns,
            column_names,
        }
    }

    /// The column list this decoder reads
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Decode one raw row buffer
    pub fn decode_row(&self, raw: Bytes) -> Result<Row> {
        let mut buf = ReadBuffer::new(raw);
        let mut values = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter() {
            let slice = buf.read_value_slice()?;
            let value = decode_column(slice.as_deref(), column)?;
            values.push(value);
        }
        Ok(Row {
            values,
            column_names: Arc::clone(&self.column_names),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::WriteBuffer;
    use crate::constants::OracleType;
    use crate::types::encode_i64;

    fn columns(list: Vec<ColumnInfo>) -> Arc<[ColumnInfo]> {
        list.into()
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(
            vec![Value::String("test".into()), Value::Integer(123), Value::Null],
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        );
        assert_eq!(row.len(), 3);
        assert_eq!(row.get_string(0), Some("test"));
        assert_eq!(row.get_i64(1), Some(123));
        assert!(row.is_null(2));
        assert!(row.get_by_name("missing").is_none());
        assert_eq!(row.get_by_name("b").and_then(Value::as_i64), Some(123));
        assert!(matches!(&row[1], Value::Integer(123)));
    }

    #[test]
    fn test_decode_row() {
        let cols = columns(vec![
            ColumnInfo::new("ID", OracleType::Number).with_precision_scale(38, 0),
            ColumnInfo::new("NAME", OracleType::Varchar),
        ]);
        let decoder = RowDecoder::new(cols);

        let mut buf = WriteBuffer::new();
        buf.write_value_slice(Some(&encode_i64(7, 38, 0).unwrap()));
        buf.write_value_slice(Some(b"seven"));

        let row = decoder.decode_row(buf.freeze()).unwrap();
        assert_eq!(row.get_i64(0), Some(7));
        assert_eq!(row.get_string(1), Some("seven"));
    }

    #[test]
    fn test_decode_row_with_null() {
        let cols = columns(vec![
            ColumnInfo::new("A", OracleType::Varchar),
            ColumnInfo::new("B", OracleType::Varchar),
        ]);
        let decoder = RowDecoder::new(cols);

        let mut buf = WriteBuffer::new();
        buf.write_value_slice(None);
        buf.write_value_slice(Some(b"x"));

        let row = decoder.decode_row(buf.freeze()).unwrap();
        assert!(row.is_null(0));
        assert_eq!(row.get_string(1), Some("x"));
    }

    #[test]
    fn test_decode_failure_fails_whole_row() {
        let cols = columns(vec![
            ColumnInfo::new("A", OracleType::Varchar),
            ColumnInfo::new("B", OracleType::Varchar),
        ]);
        let decoder = RowDecoder::new(cols);

        // Second column's slice is cut short
        let mut buf = WriteBuffer::new();
        buf.write_value_slice(Some(b"ok"));
        buf.write_u8(10);
        buf.write_bytes(b"abc");

        assert!(decoder.decode_row(buf.freeze()).is_err());
    }
}
