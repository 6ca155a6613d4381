//! Read buffer for decoding row and value data
//!
//! Provides bounds-checked reads of the primitive shapes the value codecs
//! consume: fixed-size integers, length-prefixed slices with NULL and
//! chunked-long indicators, and variable-length ub2/ub4 integers.

use bytes::Bytes;

use crate::constants::length;
use crate::error::{Error, Result};

/// A cursor over a raw row or value buffer
#[derive(Debug)]
pub struct ReadBuffer {
    data: Bytes,
    pos: usize,
}

impl ReadBuffer {
    /// Create a new ReadBuffer from bytes
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a new ReadBuffer from a byte slice
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
            pos: 0,
        }
    }

    /// Get the number of bytes remaining to be read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the cursor has consumed the whole buffer
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure_remaining(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::BufferUnderflow {
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure_remaining(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(1)?;
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read `n` bytes into an owned vector
    pub fn read_bytes_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(n)?;
        let out = self.data[self.pos..self.pos + n].to_vec();
        self.pos += n;
        Ok(out)
    }

    /// Read `n` bytes as a cheap slice of the underlying buffer
    pub fn read_bytes_owned(&mut self, n: usize) -> Result<Bytes> {
        self.ensure_remaining(n)?;
        let out = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// Read a big-endian u16
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        let v = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Read a big-endian u32
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        let v = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    /// Read a variable-length unsigned integer of up to 2 bytes
    ///
    /// A single length byte gives the number of value bytes that follow
    /// (0 means zero).
    pub fn read_ub2(&mut self) -> Result<u16> {
        Ok(self.read_ub_n(2)? as u16)
    }

    /// Read a variable-length unsigned integer of up to 4 bytes
    pub fn read_ub4(&mut self) -> Result<u32> {
        Ok(self.read_ub_n(4)? as u32)
    }

    fn read_ub_n(&mut self, max: usize) -> Result<u64> {
        let n = self.read_u8()? as usize;
        if n == 0 {
            return Ok(0);
        }
        if n > max {
            return Err(Error::InvalidLengthIndicator(n as u8));
        }
        let mut value: u64 = 0;
        for _ in 0..n {
            value = (value << 8) | self.read_u8()? as u64;
        }
        Ok(value)
    }

    /// Read one length-prefixed value slice
    ///
    /// Returns `None` for NULL (indicator 255 or zero length). A 254
    /// indicator marks data continuing as ub4-length-prefixed chunks which
    /// are concatenated until a zero-length chunk.
    pub fn read_value_slice(&mut self) -> Result<Option<Vec<u8>>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        let indicator = self.read_u8()?;
        if indicator == 0 || indicator == length::NULL_INDICATOR {
            return Ok(None);
        }
        if indicator == length::LONG_INDICATOR {
            return self.read_chunked_slice();
        }
        Ok(Some(self.read_bytes_vec(indicator as usize)?))
    }

    fn read_chunked_slice(&mut self) -> Result<Option<Vec<u8>>> {
        let mut result = Vec::new();
        loop {
            let chunk_len = self.read_ub4()? as usize;
            if chunk_len == 0 {
                break;
            }
            let chunk = self.read_bytes_vec(chunk_len)?;
            result.extend_from_slice(&chunk);
        }
        if result.is_empty() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }
}
