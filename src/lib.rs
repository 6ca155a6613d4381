#![warn(missing_docs)]

//! # orawire
//!
//! The value codec and statement-execution core of an Oracle client driver,
//! written in pure Rust.
//!
//! This crate translates host values to and from Oracle's wire
//! representations (NUMBER, DATE/TIMESTAMP, intervals, CHAR padding, LOB
//! streams, row locators) and drives prepared statements through a
//! pluggable [`NativeSession`] transport under concurrent, cancellable
//! callers. The transport itself — TCP/TLS, authentication, connection
//! strings — lives behind the session trait and is not part of this crate.
//!
//! ## Features
//!
//! - **Exact server semantics** - fractional truncation (not rounding) to a
//!   column's scale, empty-string/NULL unification, CHAR space padding,
//!   preserved time-zone offsets
//! - **Async/await** - built on Tokio; per-statement serialization with
//!   true parallelism across statements
//! - **Cancellation** - every call takes an optional deadline or cancel
//!   token; an interrupted call issues the native break and reports a bad
//!   connection
//! - **LOB streaming** - large values stream chunk-by-chunk through
//!   locators with guaranteed cleanup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orawire::{CallContext, Executor, ExecutorConfig};
//!
//! // `session` is any NativeSession implementation (the transport layer).
//! let executor = Executor::new(session, ExecutorConfig::new());
//!
//! let stmt = executor.prepare("SELECT id, name FROM users WHERE id = :1", &CallContext::none()).await?;
//! let mut rows = stmt.execute_query(&[42.into()], &CallContext::none()).await?;
//!
//! while let Some(row) = rows.next_row().await? {
//!     let id = row.get_i64(0).unwrap_or(0);
//!     let name = row.get_string(1).unwrap_or("");
//!     println!("User {}: {}", id, name);
//! }
//! ```
//!
//! ## Statement reuse
//!
//! A [`PreparedStatement`] is the expected unit of reuse: bind and execute
//! it as many times as needed, from as many tasks as needed. Calls on one
//! statement serialize; distinct statements run in parallel.
//!
//! ```rust,ignore
//! let stmt = executor.prepare("INSERT INTO logs (msg) VALUES (:1)", &CallContext::none()).await?;
//! for msg in batch {
//!     stmt.execute_update(&[msg.into()], &CallContext::none()).await?;
//! }
//! executor.commit().await?;
//! ```
//!
//! ## Deadlines and cancellation
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use orawire::CallContext;
//!
//! let ctx = CallContext::none().with_timeout(Duration::from_millis(200));
//! match stmt.execute_update(&[], &ctx).await {
//!     Err(e) if e.is_bad_connection() => { /* reconnect */ }
//!     other => { /* ... */ }
//! }
//! ```
//!
//! ## Data types
//!
//! | Oracle Type | Rust Type |
//! |-------------|-----------|
//! | NUMBER | `i64`, `f64`, [`types::OracleNumber`] |
//! | VARCHAR2, CHAR, LONG | `String` |
//! | DATE, TIMESTAMP [WITH TIME ZONE] | [`types::Timestamp`] |
//! | RAW, LONG RAW | `Vec<u8>` |
//! | BINARY_FLOAT, BINARY_DOUBLE | `f64` |
//! | INTERVAL YEAR TO MONTH | `i64` month count |
//! | INTERVAL DAY TO SECOND | `i64` nanosecond count |
//! | CLOB, BLOB | `String` / `Vec<u8>`, streamed |
//! | ROWID, UROWID | 18-character `String`, decode-only |
//! | BOOLEAN | `bool` |
//!
//! Two wire ambiguities are inherited from the protocol and documented
//! rather than papered over: an empty string binds identically to NULL, and
//! NUMBER values wider than 64 bits decode lossily unless read through
//! [`types::OracleNumber`].

pub mod buffer;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod guard;
pub mod row;
pub mod session;
pub mod statement;
pub mod statement_cache;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use codec::{decode_column, encode_for_column, encode_inferred, infer_oracle_type, EncodedValue};
pub use config::ExecutorConfig;
pub use constants::OracleType;
pub use error::{Error, Result};
pub use executor::{Executor, PreparedStatement, RowStream};
pub use guard::{CallContext, CancelToken};
pub use row::{Row, RowDecoder};
pub use session::{ExecuteOutcome, NativeHandle, NativeSession};
pub use statement::{ColumnInfo, Statement, StatementKind};
pub use statement_cache::StatementCache;
pub use types::{IntervalUnit, LobKind, LobLocator, OracleNumber, RowId, Timestamp};
pub use value::Value;
