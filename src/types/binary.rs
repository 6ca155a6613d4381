//! BINARY_FLOAT and BINARY_DOUBLE encoding and decoding
//!
//! Oracle stores these as big-endian IEEE 754 with the sign bit manipulated
//! so byte-wise comparison sorts correctly: positive values get the sign bit
//! set, negative values have every byte inverted. Decoding reverses the
//! transform.

use crate::error::{Error, Result};

/// Encode an f32 to the BINARY_FLOAT wire form (4 bytes)
pub fn encode_binary_float(value: f32) -> [u8; 4] {
    let mut bytes = value.to_bits().to_be_bytes();
    if bytes[0] & 0x80 == 0 {
        bytes[0] |= 0x80;
    } else {
        for b in &mut bytes {
            *b = !*b;
        }
    }
    bytes
}

/// Decode a BINARY_FLOAT wire form to f32
pub fn decode_binary_float(data: &[u8]) -> Result<f32> {
    let mut bytes: [u8; 4] = data
        .try_into()
        .map_err(|_| Error::DataConversion(format!("BINARY_FLOAT requires 4 bytes, got {}", data.len())))?;
    if bytes[0] & 0x80 != 0 {
        bytes[0] &= 0x7f;
    } else {
        for b in &mut bytes {
            *b = !*b;
        }
    }
    Ok(f32::from_bits(u32::from_be_bytes(bytes)))
}

/// Encode an f64 to the BINARY_DOUBLE wire form (8 bytes)
pub fn encode_binary_double(value: f64) -> [u8; 8] {
    let mut bytes = value.to_bits().to_be_bytes();
    if bytes[0] & 0x80 == 0 {
        bytes[0] |= 0x80;
    } else {
        for b in &mut bytes {
            *b = !*b;
        }
    }
    bytes
}

/// Decode a BINARY_DOUBLE wire form to f64
pub fn decode_binary_double(data: &[u8]) -> Result<f64> {
    let mut bytes: [u8; 8] = data
        .try_into()
        .map_err(|_| Error::DataConversion(format!("BINARY_DOUBLE requires 8 bytes, got {}", data.len())))?;
    if bytes[0] & 0x80 != 0 {
        bytes[0] &= 0x7f;
    } else {
        for b in &mut bytes {
            *b = !*b;
        }
    }
    Ok(f64::from_bits(u64::from_be_bytes(bytes)))
}
