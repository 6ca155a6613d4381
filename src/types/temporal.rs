//! Oracle DATE and TIMESTAMP encoding and decoding
//!
//! Oracle DATE format (7 bytes):
//! - Byte 0: Century (value + 100)
//! - Byte 1: Year in century (value + 100)
//! - Byte 2: Month (1-12)
//! - Byte 3: Day (1-31)
//! - Byte 4: Hour + 1
//! - Byte 5: Minute + 1
//! - Byte 6: Second + 1
//!
//! TIMESTAMP adds bytes 7-10: fractional seconds as big-endian nanoseconds.
//! TIMESTAMP WITH TIME ZONE adds bytes 11-12: hour offset + 20 and minute
//! offset + 60. The stored offset is the caller's offset, verbatim; values
//! are never normalized to UTC.

use crate::constants::calendar::{MAX_YEAR, MIN_YEAR};
use crate::error::{Error, Result};

/// Timezone hour offset excess
const TZ_HOUR_EXCESS: i8 = 20;
/// Timezone minute offset excess
const TZ_MINUTE_EXCESS: i8 = 60;
/// Flag marking a named timezone region (not supported)
const HAS_REGION_ID: u8 = 0x80;

/// A timestamp with explicit UTC offset
///
/// The offset records exactly what the caller supplied; decoding a stored
/// value reconstructs that offset, not the session's local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Year (1-9999)
    pub year: i32,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Sub-second nanoseconds (0-999_999_999)
    pub nanosecond: u32,
    /// UTC offset in minutes, e.g. +05:30 is 330
    pub utc_offset_minutes: i16,
}

impl Timestamp {
    /// Create a timestamp with a zero UTC offset
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond: 0,
            utc_offset_minutes: 0,
        }
    }

    /// Create a date-only value (midnight, zero offset)
    pub fn date(year: i32, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Set sub-second nanoseconds
    pub fn with_nanosecond(mut self, nanosecond: u32) -> Self {
        self.nanosecond = nanosecond;
        self
    }

    /// Set the UTC offset in minutes
    pub fn with_utc_offset(mut self, minutes: i16) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.nanosecond != 0 {
            write!(f, ".{:09}", self.nanosecond)?;
        }
        if self.utc_offset_minutes != 0 {
            let sign = if self.utc_offset_minutes < 0 { '-' } else { '+' };
            let abs = self.utc_offset_minutes.unsigned_abs();
            write!(f, " {}{:02}:{:02}", sign, abs / 60, abs % 60)?;
        }
        Ok(())
    }
}

fn check_calendar_range(ts: &Timestamp) -> Result<()> {
    if ts.year < MIN_YEAR || ts.year > MAX_YEAR {
        return Err(Error::DateOutOfRange(format!(
            "year {} is outside {}-{}",
            ts.year, MIN_YEAR, MAX_YEAR
        )));
    }
    if ts.month < 1 || ts.month > 12 || ts.day < 1 || ts.day > 31 {
        return Err(Error::DateOutOfRange(format!(
            "invalid month/day {}-{}",
            ts.month, ts.day
        )));
    }
    if ts.hour > 23 || ts.minute > 59 || ts.second > 59 || ts.nanosecond > 999_999_999 {
        return Err(Error::DateOutOfRange(format!(
            "invalid time {:02}:{:02}:{:02}.{}",
            ts.hour, ts.minute, ts.second, ts.nanosecond
        )));
    }
    Ok(())
}

/// Encode to the 7-byte DATE wire form (drops fraction and offset)
pub fn encode_date(ts: &Timestamp) -> Result<Vec<u8>> {
    check_calendar_range(ts)?;
    Ok(vec![
        (ts.year / 100) as u8 + 100,
        (ts.year % 100) as u8 + 100,
        ts.month,
        ts.day,
        ts.hour + 1,
        ts.minute + 1,
        ts.second + 1,
    ])
}

/// Encode to the TIMESTAMP wire form
///
/// Returns 11 bytes, or 13 when `include_tz` adds the offset fields.
pub fn encode_timestamp(ts: &Timestamp, include_tz: bool) -> Result<Vec<u8>> {
    let mut wire = encode_date(ts)?;
    wire.extend_from_slice(&ts.nanosecond.to_be_bytes());
    if include_tz {
        let hours = (ts.utc_offset_minutes / 60) as i8;
        let minutes = (ts.utc_offset_minutes % 60) as i8;
        wire.push((hours + TZ_HOUR_EXCESS) as u8);
        wire.push((minutes + TZ_MINUTE_EXCESS) as u8);
    }
    Ok(wire)
}

/// Decode a 7, 11, or 13-byte date/timestamp wire tuple
pub fn decode_timestamp(data: &[u8]) -> Result<Timestamp> {
    if data.len() < 7 {
        return Err(Error::DataConversion(format!(
            "timestamp requires at least 7 bytes, got {}",
            data.len()
        )));
    }

    let century = data[0] as i32 - 100;
    let year_in_century = data[1] as i32 - 100;

    let nanosecond = if data.len() >= 11 {
        u32::from_be_bytes([data[7], data[8], data[9], data[10]])
    } else {
        0
    };

    let utc_offset_minutes = if data.len() >= 13 && (data[11] != 0 || data[12] != 0) {
        if data[11] & HAS_REGION_ID != 0 {
            return Err(Error::DataConversion(
                "named timezone regions are not supported".to_string(),
            ));
        }
        let hours = data[11] as i8 - TZ_HOUR_EXCESS;
        let minutes = data[12] as i8 - TZ_MINUTE_EXCESS;
        hours as i16 * 60 + minutes as i16
    } else {
        0
    };

    Ok(Timestamp {
        year: century * 100 + year_in_century,
        month: data[2],
        day: data[3],
        hour: data[4].saturating_sub(1),
        minute: data[5].saturating_sub(1),
        second: data[6].saturating_sub(1),
        nanosecond,
        utc_offset_minutes,
    })
}
