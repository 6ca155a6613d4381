//! Oracle NUMBER encoding and decoding
//!
//! Oracle NUMBER is stored in a variable-length base-100 format:
//! - First byte: exponent (with sign encoding)
//! - Subsequent bytes: mantissa digits in base-100
//!
//! For positive numbers the exponent byte has the high bit set and mantissa
//! bytes hold value + 1. For negative numbers the exponent byte is inverted,
//! mantissa bytes hold 101 - value, and a trailing 102 byte is appended when
//! the mantissa is below its maximum length. Zero is the single byte 0x80.
//!
//! Encoding applies the server's own arithmetic rules: fractional digits
//! beyond the target scale are truncated (never rounded), and a magnitude of
//! 10^(precision-scale) or more is an overflow.

use crate::constants::number::{MAX_DIGITS, NEGATIVE_TERMINATOR, ZERO_BYTE};
use crate::error::{Error, Result};

/// Decoded Oracle NUMBER, kept as its full decimal string
///
/// The string preserves every digit the wire carried; the `to_i64`/`to_f64`
/// accessors apply the (documented) lossy conversions on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleNumber {
    value: String,
    is_integer: bool,
}

impl OracleNumber {
    /// Create an Oracle number from a decimal string representation
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_integer = !value.contains('.');
        Self { value, is_integer }
    }

    /// Full-precision decimal string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the value has no fractional part
    pub fn is_integer(&self) -> bool {
        self.is_integer
    }

    /// Convert to i64; fails when the value has a fraction or exceeds i64
    pub fn to_i64(&self) -> Result<i64> {
        self.value
            .parse()
            .map_err(|e| Error::DataConversion(format!("cannot parse NUMBER as i64: {}", e)))
    }

    /// Convert to f64
    ///
    /// Digits beyond f64 precision are lost; use [`OracleNumber::as_str`]
    /// when every digit matters.
    pub fn to_f64(&self) -> Result<f64> {
        self.value
            .parse()
            .map_err(|e| Error::DataConversion(format!("cannot parse NUMBER as f64: {}", e)))
    }
}

impl std::fmt::Display for OracleNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Parsed decimal magnitude: significant digits plus the position of the
/// decimal point relative to the first digit
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    point: i32,
}

impl Decimal {
    fn zero() -> Self {
        Self {
            negative: false,
            digits: Vec::new(),
            point: 0,
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Drop fractional digits beyond `scale` places, without rounding
    fn truncate_to_scale(&mut self, scale: i16) {
        let keep = self.point as i64 + scale as i64;
        if keep <= 0 {
            self.digits.clear();
            self.point = 0;
            return;
        }
        if (self.digits.len() as i64) > keep {
            self.digits.truncate(keep as usize);
        }
        self.strip_trailing_zeros();
    }

    fn strip_trailing_zeros(&mut self) {
        while self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        if self.digits.is_empty() {
            self.point = 0;
        }
    }

    /// Count of digits before the decimal point
    fn integer_digits(&self) -> i32 {
        self.point.max(0)
    }
}

fn parse_decimal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::DataConversion(
            "empty string cannot be encoded as NUMBER".to_string(),
        ));
    }

    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative || bytes.first() == Some(&b'+') {
        pos += 1;
    }

    let mut digits: Vec<u8> = Vec::with_capacity(MAX_DIGITS);
    let mut point: i32 = 0;
    let mut seen_digit = false;

    // Integer part
    while pos < bytes.len() {
        let b = bytes[pos];
        if b == b'.' || b == b'e' || b == b'E' {
            break;
        }
        if !b.is_ascii_digit() {
            return Err(Error::DataConversion(format!(
                "invalid character '{}' in number",
                char::from(b)
            )));
        }
        seen_digit = true;
        let digit = b - b'0';
        if digit != 0 || !digits.is_empty() {
            digits.push(digit);
        }
        pos += 1;
    }
    point = point.saturating_add(digits.len() as i32);

    // Fractional part
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() {
            let b = bytes[pos];
            if b == b'e' || b == b'E' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(Error::DataConversion(format!(
                    "invalid character '{}' in number",
                    char::from(b)
                )));
            }
            seen_digit = true;
            let digit = b - b'0';
            if digit == 0 && digits.is_empty() {
                point -= 1;
            } else {
                digits.push(digit);
            }
            pos += 1;
        }
    }

    if !seen_digit {
        return Err(Error::DataConversion(format!(
            "'{}' is not a number",
            text
        )));
    }

    // Optional exponent
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        let exp_negative = match bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if exp_start == pos || pos != bytes.len() {
            return Err(Error::DataConversion("invalid exponent".to_string()));
        }
        let exp: i32 = text[exp_start..pos]
            .parse()
            .map_err(|_| Error::DataConversion("invalid exponent".to_string()))?;
        point = point.saturating_add(if exp_negative { -exp } else { exp });
    } else if pos != bytes.len() {
        return Err(Error::DataConversion(format!(
            "trailing characters in number '{}'",
            text
        )));
    }

    let mut dec = Decimal {
        negative,
        digits,
        point,
    };
    dec.strip_trailing_zeros();
    if dec.is_zero() {
        return Ok(Decimal::zero());
    }
    Ok(dec)
}

/// Encode a decimal string to the NUMBER wire format
///
/// `precision` of 0 means unconstrained (no scale truncation, limited only
/// by the wire format itself). Otherwise fractional digits beyond `scale`
/// are truncated and magnitudes of `10^(precision-scale)` or more fail with
/// [`Error::NumericOverflow`].
pub fn encode_number(text: &str, precision: u8, scale: i16) -> Result<Vec<u8>> {
    let mut dec = parse_decimal(text)?;

    if precision > 0 {
        dec.truncate_to_scale(scale);
        let max_integer_digits = precision as i32 - scale as i32;
        if dec.integer_digits() > max_integer_digits {
            return Err(Error::NumericOverflow(format!(
                "{} exceeds NUMBER({},{})",
                text, precision, scale
            )));
        }
    }

    if dec.digits.len() > MAX_DIGITS || dec.point > 126 || dec.point < -129 {
        return Err(Error::NumericOverflow(format!(
            "{} is outside the NUMBER wire range",
            text
        )));
    }

    if dec.is_zero() {
        return Ok(vec![ZERO_BYTE]);
    }

    let Decimal {
        negative,
        mut digits,
        mut point,
    } = dec;

    // The mantissa is base-100: align the decimal point to an even digit
    // boundary so each wire byte holds a full pair.
    let half_pair = point.rem_euclid(2) == 1;
    if half_pair {
        point += 1;
    }
    if (digits.len() + half_pair as usize) % 2 == 1 {
        digits.push(0);
    }
    let num_pairs = (digits.len() + half_pair as usize) / 2;

    let mut wire = Vec::with_capacity(num_pairs + 2);

    let exponent = ((point / 2) + 192) as u8;
    wire.push(if negative { !exponent } else { exponent });

    let mut iter = digits.iter();
    for pair_index in 0..num_pairs {
        let pair = if pair_index == 0 && half_pair {
            *iter.next().unwrap_or(&0)
        } else {
            let hi = *iter.next().unwrap_or(&0);
            let lo = *iter.next().unwrap_or(&0);
            hi * 10 + lo
        };
        wire.push(if negative { 101 - pair } else { pair + 1 });
    }

    if negative && num_pairs < MAX_DIGITS / 2 {
        wire.push(NEGATIVE_TERMINATOR);
    }

    Ok(wire)
}

/// Encode an i64 to the NUMBER wire format
///
/// Integers are preserved exactly; they only overflow when the declared
/// precision cannot hold them.
pub fn encode_i64(value: i64, precision: u8, scale: i16) -> Result<Vec<u8>> {
    encode_number(&value.to_string(), precision, scale)
}

/// Encode an f64 to the NUMBER wire format
///
/// The value is rendered with shortest round-trip formatting first, so the
/// digits seen by scale truncation are exactly the digits a caller printing
/// the float would see.
pub fn encode_f64(value: f64, precision: u8, scale: i16) -> Result<Vec<u8>> {
    if !value.is_finite() {
        return Err(Error::NumericOverflow(format!(
            "{} cannot be represented as NUMBER",
            value
        )));
    }
    encode_number(&value.to_string(), precision, scale)
}

/// Encode with the full available precision (ad hoc binds with no declared
/// target type)
pub fn encode_unconstrained(text: &str) -> Result<Vec<u8>> {
    encode_number(text, 0, 0)
}

/// Decode a NUMBER wire buffer back to its decimal representation
pub fn decode_number(data: &[u8]) -> Result<OracleNumber> {
    if data.is_empty() {
        return Err(Error::DataConversion(
            "empty NUMBER buffer".to_string(),
        ));
    }

    if data.len() == 1 {
        if data[0] == ZERO_BYTE {
            return Ok(OracleNumber::new("0"));
        }
        return Err(Error::DataConversion(format!(
            "unexpected single-byte NUMBER 0x{:02x}",
            data[0]
        )));
    }

    let exponent_byte = data[0];
    let positive = (exponent_byte & 0x80) != 0;
    let exponent = if positive {
        exponent_byte as i16 - 193
    } else {
        (!exponent_byte) as i16 - 193
    };
    let mut point = exponent as i32 * 2 + 2;

    let mantissa_len = if !positive && data[data.len() - 1] == NEGATIVE_TERMINATOR {
        data.len() - 2
    } else {
        data.len() - 1
    };
    if mantissa_len == 0 {
        return Err(Error::DataConversion(
            "NUMBER buffer has no mantissa".to_string(),
        ));
    }

    let mut digits: Vec<u8> = Vec::with_capacity(MAX_DIGITS);
    for i in 0..mantissa_len {
        let byte = data[i + 1];
        let pair = if positive {
            byte.wrapping_sub(1)
        } else {
            101u8.wrapping_sub(byte)
        };
        if pair > 99 {
            return Err(Error::DataConversion(format!(
                "mantissa byte 0x{:02x} out of base-100 range",
                byte
            )));
        }

        let hi = pair / 10;
        if hi == 0 && digits.is_empty() {
            point -= 1;
        } else {
            digits.push(hi);
        }

        let lo = pair % 10;
        if lo != 0 || i < mantissa_len - 1 {
            digits.push(lo);
        }
    }

    // Trailing zeros only matter left of the decimal point
    while digits.last() == Some(&0) && (digits.len() as i32) > point {
        digits.pop();
    }

    let mut text = String::with_capacity(digits.len() + 4);
    if !positive {
        text.push('-');
    }

    let is_integer;
    if point <= 0 {
        is_integer = false;
        text.push_str("0.");
        for _ in point..0 {
            text.push('0');
        }
        for d in &digits {
            text.push(char::from(b'0' + d));
        }
    } else {
        is_integer = point as usize >= digits.len();
        for (i, d) in digits.iter().enumerate() {
            if i > 0 && i as i32 == point {
                text.push('.');
            }
            text.push(char::from(b'0' + d));
        }
        for _ in digits.len()..point as usize {
            text.push('0');
        }
    }

    if text.is_empty() || text == "-" {
        text = "0".to_string();
    }

    Ok(OracleNumber {
        value: text,
        is_integer,
    })
}
