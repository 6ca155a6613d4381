//! Error types for the statement-execution engine
//!
//! This module defines all error types that can occur while encoding bind
//! values, decoding result buffers, and driving a prepared statement through
//! a native session.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the driver core
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Statement Errors
    // =========================================================================
    /// SQL text could not be prepared (malformed SQL). Fatal to the
    /// statement, not to the connection.
    #[error("prepare failed: {0}")]
    Prepare(String),

    /// Caller supplied the wrong number of bind parameters for the
    /// statement's marker count
    #[error("parameter count mismatch: statement has {expected} markers, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Operation attempted in a state that does not allow it
    #[error("invalid statement state: {0}")]
    StatementState(String),

    /// Statement handle has been closed
    #[error("statement is closed")]
    StatementClosed,

    // =========================================================================
    // Codec Errors
    // =========================================================================
    /// Numeric value does not fit the target precision/scale
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    /// Temporal value outside the supported calendar range (year 1-9999)
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    /// Declared or inferred type has no codec
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Wire data could not be converted to a host value
    #[error("data conversion error: {0}")]
    DataConversion(String),

    // =========================================================================
    // Buffer Errors
    // =========================================================================
    /// Buffer underflow - not enough data to read
    #[error("buffer underflow: need {needed} bytes but only {available} available")]
    BufferUnderflow { needed: usize, available: usize },

    /// Invalid length indicator byte in a row buffer
    #[error("invalid length indicator: {0}")]
    InvalidLengthIndicator(u8),

    // =========================================================================
    // Connection / Server Errors
    // =========================================================================
    /// Native session lost, or an in-flight call was cancelled. Fatal to
    /// the connection; the caller must reconnect. Cancellation always maps
    /// here, even when the server had finished the call.
    #[error("bad connection")]
    BadConnection,

    /// Server-reported SQL error, carried verbatim. Never retried by this
    /// layer.
    #[error("ORA-{code:05}: {message}")]
    Oracle { code: u32, message: String },
}

impl Error {
    /// Create a new server-reported error
    pub fn oracle(code: u32, message: impl Into<String>) -> Self {
        Error::Oracle {
            code,
            message: message.into(),
        }
    }

    /// Check if this error is fatal to the connection
    pub fn is_bad_connection(&self) -> bool {
        matches!(self, Error::BadConnection)
    }

    /// Check if the statement remains usable after this error
    ///
    /// Codec contract violations fail the call but leave the prepared
    /// statement intact for the next bind/execute cycle.
    pub fn is_statement_usable(&self) -> bool {
        matches!(
            self,
            Error::ParameterCountMismatch { .. }
                | Error::NumericOverflow(_)
                | Error::DateOutOfRange(_)
                | Error::UnsupportedType(_)
                | Error::DataConversion(_)
                | Error::Oracle { .. }
        )
    }
}
