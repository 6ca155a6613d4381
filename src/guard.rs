//! Cancellation and per-handle serialization
//!
//! Native calls block on server I/O, so every executor entry point accepts
//! a [`CallContext`] carrying an optional deadline and/or [`CancelToken`].
//! The wrapper in this module races the native call against both signals;
//! when either fires it issues the session's out-of-band break and surfaces
//! [`Error::BadConnection`] — always, even if the server had already
//! completed the call, so a result is never reported for a call the caller
//! abandoned.
//!
//! Serialization itself is a per-handle `tokio::sync::Mutex` owned by the
//! prepared statement: bind, execute, and fetch-to-completion form one
//! critical section, while unrelated handles proceed in parallel. Lock
//! acquisition is FIFO, which preserves per-handle issue order.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::session::{NativeHandle, NativeSession};

/// A cooperative cancellation signal shared between a caller and an
/// in-flight statement execution
///
/// Cloning produces another handle to the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    shared: Arc<CancelShared>,
}

#[derive(Debug, Default)]
struct CancelShared {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; wakes every waiting execution
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        self.shared.notify.notify_waiters();
    }

    /// Check the flag without waiting
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until cancellation is requested
    pub async fn cancelled(&self) {
        loop {
            // Register interest before checking the flag so a concurrent
            // cancel between the check and the await is not missed.
            let notified = self.shared.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Per-call deadline and cancellation context
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    token: Option<CancelToken>,
}

impl CallContext {
    /// A context with no deadline and no cancel token
    pub fn none() -> Self {
        Self::default()
    }

    /// Set a deadline measured from the entry point's start
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation token
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    /// The configured timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve the deadline for a call starting now, falling back to the
    /// executor-wide default
    pub(crate) fn deadline(&self, default_timeout: Option<Duration>) -> Option<Instant> {
        self.timeout
            .or(default_timeout)
            .map(|t| Instant::now() + t)
    }

    pub(crate) fn token(&self) -> Option<&CancelToken> {
        self.token.as_ref()
    }
}

impl From<Duration> for CallContext {
    fn from(timeout: Duration) -> Self {
        CallContext::none().with_timeout(timeout)
    }
}

/// Race a native call against the context's deadline and cancel token
///
/// On cancellation or deadline expiry the in-flight call is dropped, the
/// session's break is issued for the handle, and the caller gets
/// [`Error::BadConnection`]. A call with no handle yet (prepare) has
/// nothing to break; dropping the future is the whole interruption.
pub(crate) async fn run_cancellable<S, F, T>(
    session: &S,
    handle: Option<NativeHandle>,
    deadline: Option<Instant>,
    token: Option<&CancelToken>,
    call: F,
) -> Result<T>
where
    S: NativeSession,
    F: Future<Output = Result<T>>,
{
    tokio::pin!(call);

    let cancelled = async {
        match token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(cancelled);

    let expired = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expired);

    let interrupted = tokio::select! {
        result = &mut call => return result,
        _ = &mut cancelled => "cancelled",
        _ = &mut expired => "deadline expired",
    };

    if let Some(handle) = handle {
        tracing::debug!(handle = handle.0, reason = interrupted, "issuing break");
        let _ = session.break_call(handle).await;
    } else {
        tracing::debug!(reason = interrupted, "call abandoned before a handle existed");
    }
    Err(Error::BadConnection)
}
