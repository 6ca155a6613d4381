//! The native session collaborator
//!
//! Everything below the codec/executor layer is abstracted behind
//! [`NativeSession`]: the component that owns the server conversation and
//! produces statement handles, raw row buffers, and LOB chunk I/O. The
//! transport, authentication, and connection-string concerns live entirely
//! on the other side of this trait.
//!
//! Implementations take `&self` and handle their own internal locking; the
//! executor guarantees that calls for one handle are serialized, but calls
//! for different handles may arrive concurrently. `break_call` is the one
//! exception: it must be callable while another call on the same handle is
//! in flight, to interrupt it.

use std::future::Future;

use bytes::Bytes;

use crate::codec::EncodedValue;
use crate::error::Result;
use crate::statement::ColumnInfo;
use crate::types::{LobKind, LobLocator};

/// Opaque identifier of a server-side prepared statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Result of executing a prepared handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// A result set is available for fetching
    RowsAvailable,
    /// Non-query statement completed, with its affected-row count
    Affected(u64),
}

/// The downstream transport/session collaborator
pub trait NativeSession: Send + Sync + 'static {
    /// Parse SQL on the server, returning the statement handle and its
    /// column descriptors (empty for non-query statements)
    fn prepare(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<(NativeHandle, Vec<ColumnInfo>)>> + Send;

    /// Bind one encoded parameter at a 1-based position
    fn bind(
        &self,
        handle: NativeHandle,
        position: u16,
        value: &EncodedValue,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Execute the handle with its current binds
    fn execute(&self, handle: NativeHandle) -> impl Future<Output = Result<ExecuteOutcome>> + Send;

    /// Fetch the next raw row buffer, or `None` at end of the result set
    fn fetch(&self, handle: NativeHandle) -> impl Future<Output = Result<Option<Bytes>>> + Send;

    /// Interrupt an in-flight call on this handle (out-of-band break)
    fn break_call(&self, handle: NativeHandle) -> impl Future<Output = Result<()>> + Send;

    /// Release the server-side statement
    fn close(&self, handle: NativeHandle) -> impl Future<Output = Result<()>> + Send;

    /// Create a temporary LOB for streaming a large bind value
    fn create_lob(&self, kind: LobKind) -> impl Future<Output = Result<LobLocator>> + Send;

    /// Read one chunk of LOB data; an empty result marks end-of-locator
    fn read_lob_chunk(
        &self,
        locator: &LobLocator,
        offset: u64,
        len: usize,
    ) -> impl Future<Output = Result<Bytes>> + Send;

    /// Write one chunk of LOB data at the given offset
    fn write_lob_chunk(
        &self,
        locator: &LobLocator,
        offset: u64,
        data: &[u8],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Free a LOB locator's server-side resources
    fn close_lob(&self, locator: &LobLocator) -> impl Future<Output = Result<()>> + Send;

    /// Commit the current transaction
    fn commit(&self) -> impl Future<Output = Result<()>> + Send;

    /// Roll back the current transaction
    fn rollback(&self) -> impl Future<Output = Result<()>> + Send;
}
