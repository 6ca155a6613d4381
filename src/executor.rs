//! Statement execution engine
//!
//! [`Executor`] prepares statements against the native session;
//! [`PreparedStatement`] owns one server-side handle's lifecycle across many
//! bind/execute cycles; [`RowStream`] lazily decodes fetched rows.
//!
//! A handle is not reentrant at the native layer, so each prepared statement
//! serializes bind, execute, and fetch-to-completion as one critical section
//! behind a per-handle async mutex. Unrelated statements share nothing and
//! run fully in parallel. Every blocking native call runs through the
//! cancellation wrapper in [`crate::guard`].

use std::fmt;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

use crate::codec::{encode_inferred, EncodedValue};
use crate::config::ExecutorConfig;
use crate::error::{Error, Result};
use crate::guard::{run_cancellable, CallContext, CancelToken};
use crate::row::{Row, RowDecoder};
use crate::session::{ExecuteOutcome, NativeHandle, NativeSession};
use crate::statement::{ColumnInfo, Statement};
use crate::statement_cache::StatementCache;
use crate::types::{LobKind, LobLocator};
use crate::value::Value;

/// Lifecycle state of one execution handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecState {
    /// Handle obtained, nothing bound yet
    Prepared,
    /// Parameters encoded and pushed to the native handle
    Bound,
    /// Execute round-trip in flight
    Executing,
    /// A result set is being fetched
    RowsAvailable,
    /// Ready for the next bind/execute cycle
    Idle,
    /// Handle released
    Closed,
}

#[derive(Debug)]
struct HandleState {
    handle: NativeHandle,
    state: ExecState,
}

/// Entry point for preparing and executing statements on one session
///
/// # Example
///
/// ```rust,ignore
/// let executor = Executor::new(session, ExecutorConfig::new());
/// let stmt = executor.prepare("SELECT name FROM users WHERE id = :1", &CallContext::none()).await?;
/// let rows = stmt.execute_query(&[42.into()], &CallContext::none()).await?;
/// ```
pub struct Executor<S: NativeSession> {
    session: Arc<S>,
    config: ExecutorConfig,
    parse_cache: StdMutex<StatementCache>,
}

impl<S: NativeSession> Executor<S> {
    /// Create an executor over a native session
    pub fn new(session: S, config: ExecutorConfig) -> Self {
        let parse_cache = StdMutex::new(StatementCache::new(config.parse_cache_size));
        Self {
            session: Arc::new(session),
            config,
            parse_cache,
        }
    }

    /// The configuration this executor runs with
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Prepare a statement, returning a reusable handle
    ///
    /// The SQL shape (kind and bind markers) comes from the parse cache;
    /// the server-side handle and column descriptors are fresh per call.
    pub async fn prepare(&self, sql: &str, ctx: &CallContext) -> Result<PreparedStatement<S>> {
        let shape = {
            let mut cache = self
                .parse_cache
                .lock()
                .map_err(|_| Error::StatementState("parse cache poisoned".to_string()))?;
            cache.get_or_parse(sql)
        };

        let deadline = ctx.deadline(self.config.call_timeout);
        let (handle, columns) = run_cancellable(
            self.session.as_ref(),
            None,
            deadline,
            ctx.token(),
            self.session.prepare(sql),
        )
        .await?;
        tracing::debug!(
            sql = sql,
            handle = handle.0,
            columns = columns.len(),
            markers = shape.parameter_count(),
            "prepared statement"
        );

        Ok(PreparedStatement {
            session: Arc::clone(&self.session),
            config: self.config.clone(),
            shape,
            columns: columns.into(),
            inner: Arc::new(Mutex::new(HandleState {
                handle,
                state: ExecState::Prepared,
            })),
        })
    }

    /// Commit the current transaction (pass-through)
    pub async fn commit(&self) -> Result<()> {
        self.session.commit().await
    }

    /// Roll back the current transaction (pass-through)
    pub async fn rollback(&self) -> Result<()> {
        self.session.rollback().await
    }
}

/// A prepared statement bound to one native handle
///
/// Cloning shares the same handle; concurrent callers are serialized, each
/// seeing a complete bind-execute-fetch cycle. Encodings are built fresh for
/// every execution and never reused.
pub struct PreparedStatement<S: NativeSession> {
    session: Arc<S>,
    config: ExecutorConfig,
    shape: Arc<Statement>,
    columns: Arc<[ColumnInfo]>,
    inner: Arc<Mutex<HandleState>>,
}

impl<S: NativeSession> Clone for PreparedStatement<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            config: self.config.clone(),
            shape: Arc::clone(&self.shape),
            columns: Arc::clone(&self.columns),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NativeSession> fmt::Debug for PreparedStatement<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.shape.sql())
            .field("columns", &self.columns.len())
            .finish()
    }
}

impl<S: NativeSession> PreparedStatement<S> {
    /// The statement's SQL text
    pub fn sql(&self) -> &str {
        self.shape.sql()
    }

    /// Column descriptors (empty for non-query statements)
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Number of bind parameters each execution requires
    pub fn parameter_count(&self) -> usize {
        self.shape.parameter_count()
    }

    /// Execute a query, returning a lazy row stream
    ///
    /// The stream owns the handle's critical section until it is drained or
    /// dropped; other callers of this statement wait their turn.
    pub async fn execute_query(
        &self,
        params: &[Value],
        ctx: &CallContext,
    ) -> Result<RowStream<S>> {
        if !self.shape.is_query() {
            return Err(Error::StatementState(
                "statement returns no rows; use execute_update".to_string(),
            ));
        }

        let deadline = ctx.deadline(self.config.call_timeout);
        let token = ctx.token().cloned();
        let mut guard = Arc::clone(&self.inner).lock_owned().await;

        let outcome = self
            .bind_and_execute(&mut guard, params, deadline, token.as_ref())
            .await?;
        if outcome != ExecuteOutcome::RowsAvailable {
            // The server disagreed with the client-side kind detection;
            // surface it rather than fetch from a rowless handle.
            guard.state = ExecState::Idle;
            return Err(Error::StatementState(
                "execute produced no result set".to_string(),
            ));
        }
        guard.state = ExecState::RowsAvailable;

        Ok(RowStream {
            session: Arc::clone(&self.session),
            config: self.config.clone(),
            decoder: RowDecoder::new(Arc::clone(&self.columns)),
            guard,
            deadline,
            token,
            state: StreamState::Active,
        })
    }

    /// Execute a non-query statement, returning the affected-row count
    pub async fn execute_update(&self, params: &[Value], ctx: &CallContext) -> Result<u64> {
        let deadline = ctx.deadline(self.config.call_timeout);
        let token = ctx.token().cloned();
        let mut guard = self.inner.lock().await;

        let outcome = self
            .bind_and_execute(&mut guard, params, deadline, token.as_ref())
            .await?;
        match outcome {
            ExecuteOutcome::Affected(count) => {
                guard.state = ExecState::Idle;
                Ok(count)
            }
            ExecuteOutcome::RowsAvailable => {
                guard.state = ExecState::Idle;
                Err(Error::StatementState(
                    "statement returns rows; use execute_query".to_string(),
                ))
            }
        }
    }

    /// Release the native handle
    ///
    /// Valid from any state and idempotent; the handle is released exactly
    /// once. An active row stream finishes first (it holds the critical
    /// section).
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.inner.lock().await;
        if guard.state == ExecState::Closed {
            return Ok(());
        }
        guard.state = ExecState::Closed;
        self.session.close(guard.handle).await
    }

    /// Encode every parameter and run the execute round-trip
    async fn bind_and_execute(
        &self,
        guard: &mut HandleState,
        params: &[Value],
        deadline: Option<Instant>,
        token: Option<&CancelToken>,
    ) -> Result<ExecuteOutcome> {
        match guard.state {
            ExecState::Closed => return Err(Error::StatementClosed),
            ExecState::Bound | ExecState::Executing => {
                // Unreachable while the critical section is held; a stale
                // transient state means a previous cycle was torn down badly.
                return Err(Error::StatementState(format!(
                    "handle left in transient state {:?}",
                    guard.state
                )));
            }
            ExecState::Prepared | ExecState::Idle | ExecState::RowsAvailable => {}
        }

        let expected = self.shape.parameter_count();
        if params.len() != expected {
            return Err(Error::ParameterCountMismatch {
                expected,
                actual: params.len(),
            });
        }

        let handle = guard.handle;

        // Fresh encodings per execution; oversized values stream through a
        // LOB locator before the statement executes.
        let mut encoded = Vec::with_capacity(params.len());
        for value in params {
            encoded.push(self.encode_param(handle, value, deadline, token).await?);
        }

        for (index, value) in encoded.iter().enumerate() {
            let pushed = run_cancellable(
                self.session.as_ref(),
                Some(handle),
                deadline,
                token,
                self.session.bind(handle, (index + 1) as u16, value),
            )
            .await;
            if let Err(e) = pushed {
                guard.state = ExecState::Idle;
                return Err(e);
            }
        }
        guard.state = ExecState::Bound;
        tracing::trace!(handle = handle.0, binds = encoded.len(), "parameters bound");

        guard.state = ExecState::Executing;
        let outcome = run_cancellable(
            self.session.as_ref(),
            Some(handle),
            deadline,
            token,
            self.session.execute(handle),
        )
        .await;
        if outcome.is_err() {
            // The statement stays usable after call-fatal errors; a bad
            // connection surfaces on the next native round-trip anyway.
            guard.state = ExecState::Idle;
        }
        outcome
    }

    async fn encode_param(
        &self,
        handle: NativeHandle,
        value: &Value,
        deadline: Option<Instant>,
        token: Option<&CancelToken>,
    ) -> Result<EncodedValue> {
        let threshold = self.config.lob_inline_threshold;
        match value {
            Value::String(s) if s.len() > threshold => {
                let locator = self
                    .stream_lob(handle, LobKind::Character, s.as_bytes(), deadline, token)
                    .await?;
                Ok(EncodedValue::Lob(locator))
            }
            Value::Bytes(b) if b.len() > threshold => {
                let locator = self
                    .stream_lob(handle, LobKind::Binary, b, deadline, token)
                    .await?;
                Ok(EncodedValue::Lob(locator))
            }
            _ => encode_inferred(value),
        }
    }

    /// Open a locator, write the value in chunks, and close it before
    /// execute proceeds. The close runs on every exit path, including
    /// errors and cancellation.
    async fn stream_lob(
        &self,
        handle: NativeHandle,
        kind: LobKind,
        data: &[u8],
        deadline: Option<Instant>,
        token: Option<&CancelToken>,
    ) -> Result<LobLocator> {
        let session = self.session.as_ref();
        let locator = run_cancellable(session, Some(handle), deadline, token, session.create_lob(kind))
            .await?;

        let chunk_size = self.config.lob_chunk_size;
        let write_all = async {
            let mut offset = 0u64;
            for chunk in data.chunks(chunk_size) {
                session.write_lob_chunk(&locator, offset, chunk).await?;
                offset += chunk.len() as u64;
            }
            Ok(())
        };
        let written = run_cancellable(session, Some(handle), deadline, token, write_all).await;

        if let Err(e) = session.close_lob(&locator).await {
            tracing::warn!(error = %e, "failed to close LOB locator");
        }

        written?;
        Ok(locator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Active,
    Done,
    Failed,
}

/// Lazy sequence of decoded rows from one execution
///
/// Finite and not restartable: each row fetched advances the native cursor.
/// A decode failure on any column fails that fetch, terminates the
/// iteration, and surfaces no partial row.
pub struct RowStream<S: NativeSession> {
    session: Arc<S>,
    config: ExecutorConfig,
    decoder: RowDecoder,
    guard: OwnedMutexGuard<HandleState>,
    deadline: Option<Instant>,
    token: Option<CancelToken>,
    state: StreamState,
}

impl<S: NativeSession> fmt::Debug for RowStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("state", &self.state)
            .finish()
    }
}

impl<S: NativeSession> RowStream<S> {
    /// Column descriptors for the rows this stream yields
    pub fn columns(&self) -> &[ColumnInfo] {
        self.decoder.columns()
    }

    /// Fetch and decode the next row, `None` at end of the result set
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        match self.state {
            StreamState::Done => return Ok(None),
            StreamState::Failed => {
                return Err(Error::StatementState(
                    "row iteration terminated by a previous error".to_string(),
                ))
            }
            StreamState::Active => {}
        }

        let handle = self.guard.handle;
        let fetched = run_cancellable(
            self.session.as_ref(),
            Some(handle),
            self.deadline,
            self.token.as_ref(),
            self.session.fetch(handle),
        )
        .await;

        let raw = match fetched {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.state = StreamState::Done;
                self.guard.state = ExecState::Idle;
                return Ok(None);
            }
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        let mut row = match self.decoder.decode_row(raw) {
            Ok(row) => row,
            Err(e) => {
                self.fail();
                return Err(e);
            }
        };

        if let Err(e) = self.materialize_lobs(&mut row).await {
            self.fail();
            return Err(e);
        }

        Ok(Some(row))
    }

    /// Drain the stream into a vector
    pub async fn collect_rows(mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    fn fail(&mut self) {
        self.state = StreamState::Failed;
        self.guard.state = ExecState::Idle;
    }

    /// Replace fetched LOB locators with their materialized contents
    ///
    /// Each locator is read chunk-by-chunk to end-of-locator and closed on
    /// every exit path.
    async fn materialize_lobs(&mut self, row: &mut Row) -> Result<()> {
        let handle = self.guard.handle;
        for value in row.values_mut() {
            let Value::Lob(locator) = value else {
                continue;
            };
            let locator = locator.clone();

            let session = self.session.as_ref();
            let chunk_size = self.config.lob_chunk_size;
            let read_all = async {
                let mut data: Vec<u8> = Vec::new();
                let mut offset = 0u64;
                loop {
                    let chunk = session.read_lob_chunk(&locator, offset, chunk_size).await?;
                    if chunk.is_empty() {
                        break;
                    }
                    offset += chunk.len() as u64;
                    data.extend_from_slice(&chunk);
                }
                Ok(data)
            };
            let read = run_cancellable(
                session,
                Some(handle),
                self.deadline,
                self.token.as_ref(),
                read_all,
            )
            .await;

            if let Err(e) = session.close_lob(&locator).await {
                tracing::warn!(error = %e, "failed to close LOB locator");
            }

            let data = read?;
            *value = if locator.is_character() {
                Value::String(String::from_utf8(data).map_err(|e| {
                    Error::DataConversion(format!("invalid UTF-8 in character LOB: {}", e))
                })?)
            } else {
                Value::Bytes(data)
            };
        }
        Ok(())
    }
}

impl<S: NativeSession> Drop for RowStream<S> {
    fn drop(&mut self) {
        // An abandoned stream leaves the handle ready for its next cycle.
        if self.guard.state == ExecState::RowsAvailable {
            self.guard.state = ExecState::Idle;
        }
    }
}
