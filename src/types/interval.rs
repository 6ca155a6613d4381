//! Oracle INTERVAL encoding and decoding
//!
//! INTERVAL YEAR TO MONTH wire format (5 bytes):
//! - Bytes 0-3: years as big-endian u32, excess 0x80000000
//! - Byte 4: months, excess 60
//!
//! INTERVAL DAY TO SECOND wire format (11 bytes):
//! - Bytes 0-3: days as big-endian u32, excess 0x80000000
//! - Byte 4: hours, excess 60
//! - Byte 5: minutes, excess 60
//! - Byte 6: seconds, excess 60
//! - Bytes 7-10: fractional-second nanoseconds, excess 0x80000000
//!
//! Host side both kinds are a single signed count: total months for
//! year-to-month, total nanoseconds for day-to-second.

use crate::constants::interval::{
    BASE_EXCESS, FIELD_EXCESS, MONTHS_PER_YEAR, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE,
    NANOS_PER_SECOND,
};
use crate::error::{Error, Result};

/// Unit in which a caller states an interval amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    /// Years (year-to-month intervals)
    Year,
    /// Months (year-to-month intervals)
    Month,
    /// Days (day-to-second intervals)
    Day,
    /// Hours (day-to-second intervals)
    Hour,
    /// Minutes (day-to-second intervals)
    Minute,
    /// Seconds (day-to-second intervals)
    Second,
}

impl IntervalUnit {
    /// Whether this unit belongs to a year-to-month interval
    pub fn is_year_to_month(&self) -> bool {
        matches!(self, IntervalUnit::Year | IntervalUnit::Month)
    }

    fn factor(&self) -> i64 {
        match self {
            IntervalUnit::Year => MONTHS_PER_YEAR,
            IntervalUnit::Month => 1,
            IntervalUnit::Day => NANOS_PER_DAY,
            IntervalUnit::Hour => NANOS_PER_HOUR,
            IntervalUnit::Minute => NANOS_PER_MINUTE,
            IntervalUnit::Second => NANOS_PER_SECOND,
        }
    }
}

/// Convert an amount in the given unit to the interval's signed count
///
/// Year/Month amounts become total months; Day through Second become total
/// nanoseconds. Fractional amounts round to the nearest whole count at the
/// requested unit boundary, so 1.25 YEAR is 15 months and 2.9 MONTH is 3.
pub fn to_signed_count(amount: f64, unit: IntervalUnit) -> Result<i64> {
    if !amount.is_finite() {
        return Err(Error::DataConversion(format!(
            "{} is not a valid interval amount",
            amount
        )));
    }
    let scaled = amount * unit.factor() as f64;
    if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
        return Err(Error::DataConversion(format!(
            "interval {} {:?} does not fit a signed 64-bit count",
            amount, unit
        )));
    }
    Ok(scaled.round() as i64)
}

/// Encode a signed month count to the year-to-month wire form
pub fn encode_year_to_month(months: i64) -> Result<[u8; 5]> {
    let years = months / MONTHS_PER_YEAR;
    let rem = months % MONTHS_PER_YEAR;
    let years: i32 = years
        .try_into()
        .map_err(|_| Error::DataConversion(format!("{} months exceeds interval range", months)))?;

    let mut wire = [0u8; 5];
    wire[..4].copy_from_slice(&(years as u32).wrapping_add(BASE_EXCESS).to_be_bytes());
    wire[4] = (rem as i8 + FIELD_EXCESS as i8) as u8;
    Ok(wire)
}

/// Decode the year-to-month wire form to a signed month count
pub fn decode_year_to_month(data: &[u8]) -> Result<i64> {
    if data.len() < 5 {
        return Err(Error::DataConversion(format!(
            "year-to-month interval requires 5 bytes, got {}",
            data.len()
        )));
    }
    let years =
        u32::from_be_bytes([data[0], data[1], data[2], data[3]]).wrapping_sub(BASE_EXCESS) as i32;
    let months = data[4] as i64 - FIELD_EXCESS as i64;
    Ok(years as i64 * MONTHS_PER_YEAR + months)
}

/// Encode a signed nanosecond count to the day-to-second wire form
pub fn encode_day_to_second(nanos: i64) -> Result<[u8; 11]> {
    let days = nanos / NANOS_PER_DAY;
    let mut rem = nanos % NANOS_PER_DAY;
    let hours = rem / NANOS_PER_HOUR;
    rem %= NANOS_PER_HOUR;
    let minutes = rem / NANOS_PER_MINUTE;
    rem %= NANOS_PER_MINUTE;
    let seconds = rem / NANOS_PER_SECOND;
    let fraction = rem % NANOS_PER_SECOND;

    let days: i32 = days
        .try_into()
        .map_err(|_| Error::DataConversion(format!("{} ns exceeds interval range", nanos)))?;

    let mut wire = [0u8; 11];
    wire[..4].copy_from_slice(&(days as u32).wrapping_add(BASE_EXCESS).to_be_bytes());
    wire[4] = (hours as i8 + FIELD_EXCESS as i8) as u8;
    wire[5] = (minutes as i8 + FIELD_EXCESS as i8) as u8;
    wire[6] = (seconds as i8 + FIELD_EXCESS as i8) as u8;
    wire[7..].copy_from_slice(&(fraction as i32 as u32).wrapping_add(BASE_EXCESS).to_be_bytes());
    Ok(wire)
}

/// Decode the day-to-second wire form to a signed nanosecond count
pub fn decode_day_to_second(data: &[u8]) -> Result<i64> {
    if data.len() < 11 {
        return Err(Error::DataConversion(format!(
            "day-to-second interval requires 11 bytes, got {}",
            data.len()
        )));
    }
    let days =
        u32::from_be_bytes([data[0], data[1], data[2], data[3]]).wrapping_sub(BASE_EXCESS) as i32;
    let hours = data[4] as i64 - FIELD_EXCESS as i64;
    let minutes = data[5] as i64 - FIELD_EXCESS as i64;
    let seconds = data[6] as i64 - FIELD_EXCESS as i64;
    let fraction =
        u32::from_be_bytes([data[7], data[8], data[9], data[10]]).wrapping_sub(BASE_EXCESS) as i32;

    Ok(days as i64 * NANOS_PER_DAY
        + hours * NANOS_PER_HOUR
        + minutes * NANOS_PER_MINUTE
        + seconds * NANOS_PER_SECOND
        + fraction as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_laws() {
        // Vectors matching NUMTOYMINTERVAL / NUMTODSINTERVAL behavior
        assert_eq!(to_signed_count(-2.0, IntervalUnit::Year).unwrap(), -24);
        assert_eq!(to_signed_count(1.25, IntervalUnit::Year).unwrap(), 15);
        assert_eq!(to_signed_count(1.5, IntervalUnit::Year).unwrap(), 18);
        assert_eq!(to_signed_count(2.75, IntervalUnit::Year).unwrap(), 33);
        assert_eq!(to_signed_count(2.1, IntervalUnit::Month).unwrap(), 2);
        assert_eq!(to_signed_count(2.9, IntervalUnit::Month).unwrap(), 3);

        assert_eq!(
            to_signed_count(1.25, IntervalUnit::Day).unwrap(),
            108_000_000_000_000
        );
        assert_eq!(
            to_signed_count(-2.0, IntervalUnit::Day).unwrap(),
            -172_800_000_000_000
        );
        assert_eq!(
            to_signed_count(2.75, IntervalUnit::Hour).unwrap(),
            9_900_000_000_000
        );
        assert_eq!(
            to_signed_count(1.25, IntervalUnit::Minute).unwrap(),
            75_000_000_000
        );
        assert_eq!(
            to_signed_count(1.25, IntervalUnit::Second).unwrap(),
            1_250_000_000
        );
    }

    #[test]
    fn test_year_to_month_roundtrip() {
        for months in [0i64, 1, -1, 12, -12, 15, -24, 119, -119, 10_000, -10_000] {
            let wire = encode_year_to_month(months).unwrap();
            assert_eq!(
                decode_year_to_month(&wire).unwrap(),
                months,
                "roundtrip failed for {} months",
                months
            );
        }
    }

    #[test]
    fn test_day_to_second_roundtrip() {
        for nanos in [
            0i64,
            1,
            -1,
            NANOS_PER_SECOND,
            -NANOS_PER_SECOND,
            NANOS_PER_DAY,
            -NANOS_PER_DAY,
            108_000_000_000_000,
            -172_800_000_000_000,
            NANOS_PER_DAY + NANOS_PER_HOUR * 3 + NANOS_PER_MINUTE * 4 + NANOS_PER_SECOND * 5 + 678,
        ] {
            let wire = encode_day_to_second(nanos).unwrap();
            assert_eq!(
                decode_day_to_second(&wire).unwrap(),
                nanos,
                "roundtrip failed for {} ns",
                nanos
            );
        }
    }

    #[test]
    fn test_year_to_month_wire_shape() {
        // +15 months is 1 year 3 months
        let wire = encode_year_to_month(15).unwrap();
        assert_eq!(&wire[..4], &0x8000_0001u32.to_be_bytes());
        assert_eq!(wire[4], 63);
    }

    #[test]
    fn test_day_to_second_wire_shape() {
        // 1 day 6 hours
        let wire = encode_day_to_second(NANOS_PER_DAY + 6 * NANOS_PER_HOUR).unwrap();
        assert_eq!(&wire[..4], &0x8000_0001u32.to_be_bytes());
        assert_eq!(wire[4], 66);
        assert_eq!(wire[5], 60);
        assert_eq!(wire[6], 60);
        assert_eq!(&wire[7..], &0x8000_0000u32.to_be_bytes());
    }

    #[test]
    fn test_truncated_wire_rejected() {
        assert!(decode_year_to_month(&[0; 4]).is_err());
        assert!(decode_day_to_second(&[0; 10]).is_err());
    }

    #[test]
    fn test_non_finite_amount() {
        assert!(to_signed_count(f64::NAN, IntervalUnit::Day).is_err());
        assert!(to_signed_count(f64::INFINITY, IntervalUnit::Year).is_err());
    }
}
