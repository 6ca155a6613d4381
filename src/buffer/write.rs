//! Write buffer for encoding row and value data

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::length;

/// A growable buffer for assembling wire-format data
#[derive(Debug, Default)]
pub struct WriteBuffer {
    data: BytesMut,
}

impl WriteBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            data: BytesMut::new(),
        }
    }

    /// Create a buffer with the given initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Current length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning immutable bytes
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) {
        self.data.put_u8(value);
    }

    /// Write a byte slice verbatim
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.put_slice(bytes);
    }

    /// Write a big-endian u16
    pub fn write_u16_be(&mut self, value: u16) {
        self.data.put_u16(value);
    }

    /// Write a big-endian u32
    pub fn write_u32_be(&mut self, value: u32) {
        self.data.put_u32(value);
    }

    /// Write a variable-length unsigned integer of up to 4 bytes
    pub fn write_ub4(&mut self, value: u32) {
        if value == 0 {
            self.data.put_u8(0);
            return;
        }
        let bytes = value.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        self.data.put_u8((4 - skip) as u8);
        self.data.put_slice(&bytes[skip..]);
    }

    /// Write one length-prefixed value slice
    ///
    /// `None` writes the NULL indicator. Data longer than 253 bytes is
    /// written with the chunked-long indicator followed by ub4-prefixed
    /// chunks and a zero terminator.
    pub fn write_value_slice(&mut self, value: Option<&[u8]>) {
        match value {
            None => self.data.put_u8(length::NULL_INDICATOR),
            // The wire cannot distinguish empty from NULL; encode it the
            // same way so decode is symmetric.
            Some([]) => self.data.put_u8(length::NULL_INDICATOR),
            Some(data) if data.len() < length::LONG_INDICATOR as usize => {
                self.data.put_u8(data.len() as u8);
                self.data.put_slice(data);
            }
            Some(data) => {
                self.data.put_u8(length::LONG_INDICATOR);
                for chunk in data.chunks(u32::MAX as usize) {
                    self.write_ub4(chunk.len() as u32);
                    self.data.put_slice(chunk);
                }
                self.write_ub4(0);
            }
        }
    }
}
