//! Value dispatch: declared type to codec
//!
//! The single entry point for "encode parameter" and "decode column". Host
//! values and wire encodings are both closed enums, so dispatch is an
//! exhaustive match and an unknown declared type fails fast with
//! [`Error::UnsupportedType`] instead of being coerced.

use bytes::Bytes;

use crate::constants::number::MAX_PRECISION;
use crate::constants::OracleType;
use crate::error::{Error, Result};
use crate::statement::ColumnInfo;
use crate::types::{
    decode_binary_double, decode_binary_float, decode_day_to_second, decode_number, decode_raw,
    decode_rowid, decode_text, decode_timestamp, decode_year_to_month, encode_binary_double,
    encode_binary_float, encode_bytes, encode_date, encode_day_to_second, encode_f64, encode_i64,
    encode_number, encode_text, encode_timestamp, encode_year_to_month, to_signed_count, LobKind,
    LobLocator,
};
use crate::value::Value;

/// A bind value translated to its wire representation
///
/// The tag is always derivable from the column metadata or the host value's
/// variant, and every variant has a decode path back to a [`Value`].
#[derive(Debug, Clone)]
pub enum EncodedValue {
    /// NULL (also the encoding of empty strings and byte sequences)
    Null,
    /// NUMBER base-100 digit buffer
    Number(Vec<u8>),
    /// BINARY_FLOAT wire form
    BinaryFloat([u8; 4]),
    /// BINARY_DOUBLE wire form
    BinaryDouble([u8; 8]),
    /// DATE/TIMESTAMP field tuple (7, 11, or 13 bytes)
    DateTime(Vec<u8>),
    /// INTERVAL YEAR TO MONTH wire tuple
    IntervalYearToMonth([u8; 5]),
    /// INTERVAL DAY TO SECOND wire tuple
    IntervalDayToSecond([u8; 11]),
    /// Variable-width character data
    Text(Bytes),
    /// Variable-width binary data
    Binary(Bytes),
    /// Single-byte boolean
    Boolean([u8; 1]),
    /// Reference to streamed LOB data
    Lob(LobLocator),
}

impl EncodedValue {
    /// The wire bytes to hand the native session, `None` for NULL
    pub fn wire_bytes(&self) -> Option<Vec<u8>> {
        match self {
            EncodedValue::Null => None,
            EncodedValue::Number(buf) => Some(buf.clone()),
            EncodedValue::BinaryFloat(buf) => Some(buf.to_vec()),
            EncodedValue::BinaryDouble(buf) => Some(buf.to_vec()),
            EncodedValue::DateTime(buf) => Some(buf.clone()),
            EncodedValue::IntervalYearToMonth(buf) => Some(buf.to_vec()),
            EncodedValue::IntervalDayToSecond(buf) => Some(buf.to_vec()),
            EncodedValue::Text(buf) | EncodedValue::Binary(buf) => Some(buf.to_vec()),
            EncodedValue::Boolean(buf) => Some(buf.to_vec()),
            EncodedValue::Lob(locator) => Some(locator.as_bytes().to_vec()),
        }
    }

    /// Check if this encoding is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, EncodedValue::Null)
    }
}

/// Infer the Oracle type for a bind with no declared target
pub fn infer_oracle_type(value: &Value) -> OracleType {
    match value {
        Value::Null => OracleType::Varchar,
        Value::String(_) => OracleType::Varchar,
        Value::Bytes(_) => OracleType::Raw,
        Value::Integer(_) | Value::Number(_) | Value::Boolean(_) => OracleType::Number,
        Value::Float(_) => OracleType::Number,
        Value::Timestamp(_) => OracleType::TimestampTz,
        Value::IntervalYearToMonth(_) => OracleType::IntervalYm,
        Value::IntervalDayToSecond(_) => OracleType::IntervalDs,
        Value::Interval { unit, .. } => {
            if unit.is_year_to_month() {
                OracleType::IntervalYm
            } else {
                OracleType::IntervalDs
            }
        }
        Value::Lob(locator) => {
            if locator.is_character() {
                OracleType::Clob
            } else {
                OracleType::Blob
            }
        }
    }
}

/// Encode a bind parameter with no declared target type
///
/// Inference follows the table in [`infer_oracle_type`]: booleans become a
/// 1/0 NUMBER, integers and floats a NUMBER at full precision, text and
/// bytes their variable-width forms, timestamps carry their offset.
pub fn encode_inferred(value: &Value) -> Result<EncodedValue> {
    match value {
        Value::Null => Ok(EncodedValue::Null),
        Value::Boolean(b) => Ok(EncodedValue::Number(encode_i64(*b as i64, 0, 0)?)),
        Value::Integer(i) => Ok(EncodedValue::Number(encode_i64(*i, 0, 0)?)),
        Value::Float(f) => Ok(EncodedValue::Number(encode_f64(*f, 0, 0)?)),
        Value::Number(n) => Ok(EncodedValue::Number(encode_number(n.as_str(), 0, 0)?)),
        Value::String(s) => Ok(match encode_text(s) {
            Some(buf) => EncodedValue::Text(buf),
            None => EncodedValue::Null,
        }),
        Value::Bytes(b) => Ok(match encode_bytes(b) {
            Some(buf) => EncodedValue::Binary(buf),
            None => EncodedValue::Null,
        }),
        Value::Timestamp(ts) => Ok(EncodedValue::DateTime(encode_timestamp(ts, true)?)),
        Value::IntervalYearToMonth(months) => {
            Ok(EncodedValue::IntervalYearToMonth(encode_year_to_month(*months)?))
        }
        Value::IntervalDayToSecond(nanos) => {
            Ok(EncodedValue::IntervalDayToSecond(encode_day_to_second(*nanos)?))
        }
        Value::Interval { amount, unit } => {
            let count = to_signed_count(*amount, *unit)?;
            if unit.is_year_to_month() {
                Ok(EncodedValue::IntervalYearToMonth(encode_year_to_month(count)?))
            } else {
                Ok(EncodedValue::IntervalDayToSecond(encode_day_to_second(count)?))
            }
        }
        Value::Lob(locator) => Ok(EncodedValue::Lob(locator.clone())),
    }
}

/// Encode a bind parameter against a declared column type
pub fn encode_for_column(value: &Value, column: &ColumnInfo) -> Result<EncodedValue> {
    if value.is_null() {
        return Ok(EncodedValue::Null);
    }

    let mismatch = || {
        Error::UnsupportedType(format!(
            "cannot bind {} value to {:?} column {}",
            variant_name(value),
            column.oracle_type,
            column.name
        ))
    };

    match column.oracle_type {
        OracleType::Number => {
            let precision = if column.precision > 0 {
                column.precision
            } else {
                MAX_PRECISION
            };
            let buf = match value {
                Value::Integer(i) => encode_i64(*i, precision, column.scale)?,
                Value::Float(f) => encode_f64(*f, precision, column.scale)?,
                Value::Number(n) => encode_number(n.as_str(), precision, column.scale)?,
                Value::Boolean(b) => encode_i64(*b as i64, precision, column.scale)?,
                _ => return Err(mismatch()),
            };
            Ok(EncodedValue::Number(buf))
        }
        OracleType::BinaryFloat => {
            let f = value.as_f64().ok_or_else(mismatch)?;
            Ok(EncodedValue::BinaryFloat(encode_binary_float(f as f32)))
        }
        OracleType::BinaryDouble => {
            let f = value.as_f64().ok_or_else(mismatch)?;
            Ok(EncodedValue::BinaryDouble(encode_binary_double(f)))
        }
        OracleType::Varchar | OracleType::Char | OracleType::Long => match value {
            Value::String(s) => Ok(match encode_text(s) {
                Some(buf) => EncodedValue::Text(buf),
                None => EncodedValue::Null,
            }),
            _ => Err(mismatch()),
        },
        OracleType::Raw | OracleType::LongRaw => match value {
            Value::Bytes(b) => Ok(match encode_bytes(b) {
                Some(buf) => EncodedValue::Binary(buf),
                None => EncodedValue::Null,
            }),
            _ => Err(mismatch()),
        },
        OracleType::Date => {
            let ts = value.as_timestamp().ok_or_else(mismatch)?;
            Ok(EncodedValue::DateTime(encode_date(ts)?))
        }
        OracleType::Timestamp | OracleType::TimestampTz | OracleType::TimestampLtz => {
            let ts = value.as_timestamp().ok_or_else(mismatch)?;
            Ok(EncodedValue::DateTime(encode_timestamp(
                ts,
                column.oracle_type.has_time_zone(),
            )?))
        }
        OracleType::IntervalYm => {
            let months = match value {
                Value::IntervalYearToMonth(m) => *m,
                Value::Integer(m) => *m,
                Value::Interval { amount, unit } if unit.is_year_to_month() => {
                    to_signed_count(*amount, *unit)?
                }
                _ => return Err(mismatch()),
            };
            Ok(EncodedValue::IntervalYearToMonth(encode_year_to_month(months)?))
        }
        OracleType::IntervalDs => {
            let nanos = match value {
                Value::IntervalDayToSecond(ns) => *ns,
                Value::Integer(ns) => *ns,
                Value::Interval { amount, unit } if !unit.is_year_to_month() => {
                    to_signed_count(*amount, *unit)?
                }
                _ => return Err(mismatch()),
            };
            Ok(EncodedValue::IntervalDayToSecond(encode_day_to_second(nanos)?))
        }
        OracleType::Clob => match value {
            Value::String(s) => Ok(match encode_text(s) {
                Some(buf) => EncodedValue::Text(buf),
                None => EncodedValue::Null,
            }),
            Value::Lob(locator) => Ok(EncodedValue::Lob(locator.clone())),
            _ => Err(mismatch()),
        },
        OracleType::Blob => match value {
            Value::Bytes(b) => Ok(match encode_bytes(b) {
                Some(buf) => EncodedValue::Binary(buf),
                None => EncodedValue::Null,
            }),
            Value::Lob(locator) => Ok(EncodedValue::Lob(locator.clone())),
            _ => Err(mismatch()),
        },
        OracleType::Boolean => {
            let b = value.as_bool().ok_or_else(mismatch)?;
            Ok(EncodedValue::Boolean([b as u8]))
        }
        OracleType::Rowid | OracleType::Urowid => Err(Error::UnsupportedType(format!(
            "row locator column {} is decode-only",
            column.name
        ))),
    }
}

/// Decode one column's wire slice to a host value
///
/// `None` (the NULL indicator) decodes to [`Value::Null`] for every type;
/// NULL never decodes to a zero value.
pub fn decode_column(data: Option<&[u8]>, column: &ColumnInfo) -> Result<Value> {
    let Some(data) = data else {
        return Ok(Value::Null);
    };

    match column.oracle_type {
        OracleType::Varchar | OracleType::Char | OracleType::Long => Ok(Value::String(
            decode_text(data, column.width, column.oracle_type.is_fixed_width())?,
        )),
        OracleType::Number => decode_number_column(data, column),
        OracleType::BinaryFloat => Ok(Value::Float(decode_binary_float(data)? as f64)),
        OracleType::BinaryDouble => Ok(Value::Float(decode_binary_double(data)?)),
        OracleType::Raw | OracleType::LongRaw => Ok(Value::Bytes(decode_raw(data))),
        OracleType::Date
        | OracleType::Timestamp
        | OracleType::TimestampTz
        | OracleType::TimestampLtz => Ok(Value::Timestamp(decode_timestamp(data)?)),
        OracleType::IntervalYm => Ok(Value::IntervalYearToMonth(decode_year_to_month(data)?)),
        OracleType::IntervalDs => Ok(Value::IntervalDayToSecond(decode_day_to_second(data)?)),
        OracleType::Rowid | OracleType::Urowid => decode_rowid_column(data, column.oracle_type),
        OracleType::Clob => Ok(Value::Lob(LobLocator::new(
            Bytes::copy_from_slice(data),
            LobKind::Character,
            0,
        ))),
        OracleType::Blob => Ok(Value::Lob(LobLocator::new(
            Bytes::copy_from_slice(data),
            LobKind::Binary,
            0,
        ))),
        OracleType::Boolean => Ok(Value::Boolean(data.last().copied().unwrap_or(0) == 1)),
    }
}

/// NUMBER columns decode to f64, except integer-only declarations (scale 0
/// with a stated precision) which yield i64 when the magnitude fits.
///
/// Values whose precision exceeds what f64 or i64 can hold lose digits
/// here. That matches the original driver and is a known limitation;
/// callers needing every digit can decode through
/// [`crate::types::decode_number`] and keep the [`crate::types::OracleNumber`].
fn decode_number_column(data: &[u8], column: &ColumnInfo) -> Result<Value> {
    let number = decode_number(data)?;
    let integer_only = column.scale == 0 && column.precision > 0;
    if integer_only && number.is_integer() {
        if let Ok(i) = number.to_i64() {
            return Ok(Value::Integer(i));
        }
    }
    Ok(Value::Float(number.to_f64()?))
}

fn decode_rowid_column(data: &[u8], oracle_type: OracleType) -> Result<Value> {
    // Universal rowids carry a type indicator: 1 is a physical rowid, any
    // other value a logical (index-organized) form whose body is already
    // printable.
    if oracle_type == OracleType::Urowid && data.first() != Some(&1) {
        if data.len() > 1 {
            return Ok(Value::String(
                String::from_utf8_lossy(&data[1..]).to_string(),
            ));
        }
        return Err(Error::DataConversion(format!(
            "invalid row locator of {} bytes",
            data.len()
        )));
    }
    let rowid = decode_rowid(data)?;
    Ok(Value::String(rowid.to_locator_string()))
}

fn variant_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::String(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Number(_) => "number",
        Value::Boolean(_) => "boolean",
        Value::Timestamp(_) => "timestamp",
        Value::IntervalYearToMonth(_) => "interval year-to-month",
        Value::IntervalDayToSecond(_) => "interval day-to-second",
        Value::Interval { .. } => "interval",
        Value::Lob(_) => "lob",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntervalUnit;

    fn column(oracle_type: OracleType) -> ColumnInfo {
        ColumnInfo::new("C", oracle_type)
    }

    fn number_column(precision: u8, scale: i16) -> ColumnInfo {
        let mut col = column(OracleType::Number);
        col.precision = precision;
        col.scale = scale;
        col
    }

    #[test]
    fn test_inference_table() {
        assert_eq!(infer_oracle_type(&Value::Boolean(true)), OracleType::Number);
        assert_eq!(infer_oracle_type(&Value::Integer(1)), OracleType::Number);
        assert_eq!(infer_oracle_type(&Value::Float(1.0)), OracleType::Number);
        assert_eq!(
            infer_oracle_type(&Value::String("x".into())),
            OracleType::Varchar
        );
        assert_eq!(infer_oracle_type(&Value::Bytes(vec![1])), OracleType::Raw);
        assert_eq!(
            infer_oracle_type(&Value::Timestamp(crate::types::Timestamp::date(2024, 1, 1))),
            OracleType::TimestampTz
        );
    }

    #[test]
    fn test_boolean_infers_single_digit_number() {
        let encoded = encode_inferred(&Value::Boolean(true)).unwrap();
        let EncodedValue::Number(buf) = encoded else {
            panic!("expected NUMBER encoding");
        };
        assert_eq!(decode_number(&buf).unwrap().as_str(), "1");

        let encoded = encode_inferred(&Value::Boolean(false)).unwrap();
        let EncodedValue::Number(buf) = encoded else {
            panic!("expected NUMBER encoding");
        };
        assert_eq!(decode_number(&buf).unwrap().as_str(), "0");
    }

    #[test]
    fn test_empty_text_encodes_null() {
        assert!(encode_inferred(&Value::String(String::new()))
            .unwrap()
            .is_null());
        assert!(encode_inferred(&Value::Bytes(Vec::new()))
            .unwrap()
            .is_null());
        assert!(
            encode_for_column(&Value::String(String::new()), &column(OracleType::Varchar))
                .unwrap()
                .is_null()
        );
    }

    #[test]
    fn test_number_column_roundtrip() {
        let col = number_column(38, 0);
        let encoded = encode_for_column(&Value::Integer(123), &col).unwrap();
        let wire = encoded.wire_bytes().unwrap();
        let decoded = decode_column(Some(&wire), &col).unwrap();
        assert!(matches!(decoded, Value::Integer(123)));
    }

    #[test]
    fn test_number_scale_truncates() {
        let col = number_column(38, 8);
        let encoded = encode_for_column(&Value::Float(1.9873046875), &col).unwrap();
        let wire = encoded.wire_bytes().unwrap();
        let decoded = decode_column(Some(&wire), &col).unwrap();
        assert_eq!(decoded.as_f64(), Some(1.98730468));
    }

    #[test]
    fn test_number_decode_float_default() {
        // Without a declared precision the value stays floating point
        let col = number_column(0, 0);
        let wire = encode_i64(7, 0, 0).unwrap();
        let decoded = decode_column(Some(&wire), &col).unwrap();
        assert!(matches!(decoded, Value::Float(f) if f == 7.0));
    }

    #[test]
    fn test_unknown_bind_combination_fails_fast() {
        let err = encode_for_column(&Value::Integer(5), &column(OracleType::Varchar)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));

        let err =
            encode_for_column(&Value::String("x".into()), &column(OracleType::Rowid)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_null_decodes_to_null_for_every_type() {
        for ty in [
            OracleType::Varchar,
            OracleType::Number,
            OracleType::Date,
            OracleType::Raw,
            OracleType::IntervalDs,
            OracleType::Clob,
            OracleType::Boolean,
        ] {
            let decoded = decode_column(None, &column(ty)).unwrap();
            assert!(decoded.is_null(), "{:?} NULL must decode to Null", ty);
        }
    }

    #[test]
    fn test_char_column_pads() {
        let mut col = column(OracleType::Char);
        col.width = 5;
        let decoded = decode_column(Some(b"ab"), &col).unwrap();
        assert_eq!(decoded.as_str(), Some("ab   "));
    }

    #[test]
    fn test_interval_through_units() {
        let encoded = encode_for_column(
            &Value::Interval {
                amount: 1.25,
                unit: IntervalUnit::Year,
            },
            &column(OracleType::IntervalYm),
        )
        .unwrap();
        let wire = encoded.wire_bytes().unwrap();
        let decoded = decode_column(Some(&wire), &column(OracleType::IntervalYm)).unwrap();
        assert!(matches!(decoded, Value::IntervalYearToMonth(15)));

        let encoded = encode_for_column(
            &Value::Interval {
                amount: 1.25,
                unit: IntervalUnit::Day,
            },
            &column(OracleType::IntervalDs),
        )
        .unwrap();
        let wire = encoded.wire_bytes().unwrap();
        let decoded = decode_column(Some(&wire), &column(OracleType::IntervalDs)).unwrap();
        assert!(matches!(
            decoded,
            Value::IntervalDayToSecond(108_000_000_000_000)
        ));
    }

    #[test]
    fn test_interval_unit_family_mismatch() {
        let err = encode_for_column(
            &Value::Interval {
                amount: 1.0,
                unit: IntervalUnit::Day,
            },
            &column(OracleType::IntervalYm),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_rowid_decodes_to_18_chars() {
        let wire = [1u8, 0, 1, 0x22, 0x93, 0, 4, 0, 0, 0x03, 0x6B, 0, 9];
        let decoded = decode_column(Some(&wire), &column(OracleType::Rowid)).unwrap();
        let s = decoded.as_str().unwrap();
        assert_eq!(s.len(), 18);
    }

    #[test]
    fn test_lob_column_decodes_to_locator() {
        let decoded = decode_column(Some(&[9, 9, 9]), &column(OracleType::Clob)).unwrap();
        let locator = decoded.as_lob().unwrap();
        assert!(locator.is_character());
        assert_eq!(locator.as_bytes(), &[9, 9, 9]);
    }
}
