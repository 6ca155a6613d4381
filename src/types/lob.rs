//! LOB (Large Object) locator types
//!
//! LOB columns are fetched and bound by reference: the wire carries an
//! opaque locator, and the data itself moves through chunked read/write
//! calls against the native session. The streaming loops live in the
//! executor, which owns the session; this module defines the locator value
//! they operate on.

use bytes::Bytes;

/// Kind of large object a locator refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobKind {
    /// Character large object; data is UTF-8 text
    Character,
    /// Binary large object
    Binary,
}

/// An opaque server-side reference to a LOB's storage
#[derive(Debug, Clone)]
pub struct LobLocator {
    locator: Bytes,
    kind: LobKind,
    /// Size in bytes, as reported by the server at fetch time
    size: u64,
}

impl LobLocator {
    /// Create a locator from its raw server bytes
    pub fn new(locator: Bytes, kind: LobKind, size: u64) -> Self {
        Self {
            locator,
            kind,
            size,
        }
    }

    /// Raw locator bytes, for sending back to the server in LOB operations
    pub fn as_bytes(&self) -> &[u8] {
        &self.locator
    }

    /// LOB kind
    pub fn kind(&self) -> LobKind {
        self.kind
    }

    /// Check if this is a character LOB
    pub fn is_character(&self) -> bool {
        self.kind == LobKind::Character
    }

    /// Reported size of the LOB in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check if the LOB holds no data
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_accessors() {
        let locator = LobLocator::new(Bytes::from_static(&[1, 2, 3]), LobKind::Character, 42);
        assert_eq!(locator.as_bytes(), &[1, 2, 3]);
        assert!(locator.is_character());
        assert_eq!(locator.size(), 42);
        assert!(!locator.is_empty());
    }

    #[test]
    fn test_empty_lob() {
        let locator = LobLocator::new(Bytes::new(), LobKind::Binary, 0);
        assert!(locator.is_empty());
        assert_eq!(locator.kind(), LobKind::Binary);
    }
}
