//! Character and raw-byte codec
//!
//! Two server behaviors live here rather than in the dispatch layer:
//!
//! - Fixed-width CHAR columns are padded by the server, so decode right-pads
//!   with spaces to the declared width while encode sends the value as-is.
//! - A zero-length string or byte value is stored identically to NULL. The
//!   encoder therefore emits NULL for empty values, and decode cannot tell
//!   the two apart. This is an ambiguity of the wire protocol itself, not of
//!   this codec.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Encode a text bind value
///
/// Returns `None` when the value must be sent as NULL (empty input).
pub fn encode_text(value: &str) -> Option<Bytes> {
    if value.is_empty() {
        None
    } else {
        Some(Bytes::copy_from_slice(value.as_bytes()))
    }
}

/// Encode a raw byte bind value
///
/// Returns `None` when the value must be sent as NULL (empty input).
pub fn encode_bytes(value: &[u8]) -> Option<Bytes> {
    if value.is_empty() {
        None
    } else {
        Some(Bytes::copy_from_slice(value))
    }
}

/// Decode a character column value
///
/// `declared_width` of 0 means unconstrained. Fixed-width columns are
/// space-padded up to the declared width.
pub fn decode_text(data: &[u8], declared_width: u32, fixed_width: bool) -> Result<String> {
    let mut text = String::from_utf8(data.to_vec())
        .map_err(|e| Error::DataConversion(format!("invalid UTF-8 in string column: {}", e)))?;
    if fixed_width && declared_width > 0 {
        let width = declared_width as usize;
        let char_count = text.chars().count();
        if char_count < width {
            text.extend(std::iter::repeat(' ').take(width - char_count));
        }
    }
    Ok(text)
}

/// Decode a raw byte column value
pub fn decode_raw(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_encodes_as_null() {
        assert!(encode_text("").is_none());
        assert!(encode_bytes(b"").is_none());
        assert_eq!(encode_text("x").unwrap(), Bytes::from_static(b"x"));
    }

    #[test]
    fn test_variable_width_never_pads() {
        assert_eq!(decode_text(b"abc", 10, false).unwrap(), "abc");
    }

    #[test]
    fn test_fixed_width_pads_on_decode() {
        assert_eq!(decode_text(b"abc", 6, true).unwrap(), "abc   ");
        // Already at width: unchanged
        assert_eq!(decode_text(b"abcdef", 6, true).unwrap(), "abcdef");
        // Unknown width: unchanged
        assert_eq!(decode_text(b"abc", 0, true).unwrap(), "abc");
    }

    #[test]
    fn test_fixed_width_counts_chars_not_bytes() {
        // Two characters, four bytes; padding counts characters
        assert_eq!(decode_text("éé".as_bytes(), 4, true).unwrap(), "éé  ");
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(decode_text(&[0xff, 0xfe], 0, false).is_err());
    }
}
