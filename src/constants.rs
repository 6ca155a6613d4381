//! Protocol constants and Oracle type codes
//!
//! Wire-level constants shared by the codecs and the row decoder. The type
//! codes match Oracle's internal data type numbers.

use crate::error::{Error, Result};

/// Length indicator bytes used in row buffers
pub mod length {
    /// Data longer than 253 bytes follows as length-prefixed chunks
    pub const LONG_INDICATOR: u8 = 254;
    /// Column value is NULL
    pub const NULL_INDICATOR: u8 = 255;
}

/// Limits of the NUMBER wire format
pub mod number {
    /// Maximum significant decimal digits in a NUMBER
    pub const MAX_PRECISION: u8 = 38;
    /// Maximum decimal digits held in the base-100 mantissa
    pub const MAX_DIGITS: usize = 40;
    /// Distinguished single-byte encoding of zero
    pub const ZERO_BYTE: u8 = 0x80;
    /// Terminator appended to negative mantissas below max length
    pub const NEGATIVE_TERMINATOR: u8 = 102;
}

/// Calendar range accepted by the temporal codec
pub mod calendar {
    /// First supported year
    pub const MIN_YEAR: i32 = 1;
    /// Last supported year
    pub const MAX_YEAR: i32 = 9999;
}

/// Fixed multipliers for interval day-to-second units, in nanoseconds
pub mod interval {
    /// Nanoseconds in one second
    pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
    /// Nanoseconds in one minute
    pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
    /// Nanoseconds in one hour
    pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
    /// Nanoseconds in one day
    pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;
    /// Months in one year
    pub const MONTHS_PER_YEAR: i64 = 12;
    /// Excess applied to the four-byte fields of interval wire tuples
    pub const BASE_EXCESS: u32 = 0x8000_0000;
    /// Excess applied to the single-byte fields of interval wire tuples
    pub const FIELD_EXCESS: u8 = 60;
}

/// Oracle data type numbers, as they appear in column metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OracleType {
    /// VARCHAR2 string type
    Varchar = 1,
    /// NUMBER type
    Number = 2,
    /// LONG string type
    Long = 8,
    /// ROWID
    Rowid = 11,
    /// DATE type
    Date = 12,
    /// RAW binary type
    Raw = 23,
    /// LONG RAW binary type
    LongRaw = 24,
    /// CHAR fixed-length string
    Char = 96,
    /// BINARY_FLOAT
    BinaryFloat = 100,
    /// BINARY_DOUBLE
    BinaryDouble = 101,
    /// CLOB
    Clob = 112,
    /// BLOB
    Blob = 113,
    /// TIMESTAMP
    Timestamp = 180,
    /// TIMESTAMP WITH TIME ZONE
    TimestampTz = 181,
    /// INTERVAL YEAR TO MONTH
    IntervalYm = 182,
    /// INTERVAL DAY TO SECOND
    IntervalDs = 183,
    /// UROWID
    Urowid = 208,
    /// TIMESTAMP WITH LOCAL TIME ZONE
    TimestampLtz = 231,
    /// BOOLEAN (23c+)
    Boolean = 252,
}

impl OracleType {
    /// Check if this is a character type
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            OracleType::Varchar | OracleType::Char | OracleType::Long
        )
    }

    /// Check if this is a fixed-width character type (server pads to width)
    pub fn is_fixed_width(&self) -> bool {
        matches!(self, OracleType::Char)
    }

    /// Check if this is a LOB type fetched by locator
    pub fn is_lob(&self) -> bool {
        matches!(self, OracleType::Clob | OracleType::Blob)
    }

    /// Check if values of this type carry a time zone offset on the wire
    pub fn has_time_zone(&self) -> bool {
        matches!(self, OracleType::TimestampTz)
    }
}

impl TryFrom<u8> for OracleType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(OracleType::Varchar),
            2 => Ok(OracleType::Number),
            8 => Ok(OracleType::Long),
            11 => Ok(OracleType::Rowid),
            12 => Ok(OracleType::Date),
            23 => Ok(OracleType::Raw),
            24 => Ok(OracleType::LongRaw),
            96 => Ok(OracleType::Char),
            100 => Ok(OracleType::BinaryFloat),
            101 => Ok(OracleType::BinaryDouble),
            112 => Ok(OracleType::Clob),
            113 => Ok(OracleType::Blob),
            180 => Ok(OracleType::Timestamp),
            181 => Ok(OracleType::TimestampTz),
            182 => Ok(OracleType::IntervalYm),
            183 => Ok(OracleType::IntervalDs),
            208 => Ok(OracleType::Urowid),
            231 => Ok(OracleType::TimestampLtz),
            252 => Ok(OracleType::Boolean),
            other => Err(Error::UnsupportedType(format!(
                "unknown Oracle type number {}",
                other
            ))),
        }
    }
}
