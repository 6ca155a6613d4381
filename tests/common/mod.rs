//! In-memory native session double
//!
//! Scripts statement behavior by SQL text: echo bound values back as rows,
//! serve fixed rows, report affected counts, sleep to simulate a slow
//! server, or fail at prepare. LOB data lives in an in-memory store so
//! streaming and cleanup can be observed.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use orawire::buffer::WriteBuffer;
use orawire::{
    ColumnInfo, EncodedValue, Error, ExecuteOutcome, LobKind, LobLocator, NativeHandle,
    NativeSession, Result,
};

/// Scripted behavior for one SQL text
#[derive(Clone)]
pub enum MockBehavior {
    /// Execute yields one row echoing the bound values, in bind order
    EchoBinds(Vec<ColumnInfo>),
    /// Execute yields these raw row buffers
    Rows(Vec<ColumnInfo>, Vec<Bytes>),
    /// Non-query statement affecting this many rows
    Affected(u64),
    /// Sleep, then affect this many rows
    SlowAffected(Duration, u64),
    /// Prepare fails with this message
    PrepareError(String),
}

#[derive(Default)]
struct MockStatement {
    behavior: Option<MockBehavior>,
    binds: Vec<(u16, Option<Vec<u8>>)>,
    pending_rows: VecDeque<Bytes>,
}

struct MockLob {
    data: Vec<u8>,
    closed: bool,
}

#[derive(Default)]
struct MockInner {
    scripts: HashMap<String, MockBehavior>,
    next_handle: u64,
    next_lob: u64,
    statements: HashMap<u64, MockStatement>,
    lobs: HashMap<Vec<u8>, MockLob>,
    breaks: u32,
    close_counts: HashMap<u64, u32>,
    commits: u32,
    rollbacks: u32,
    lob_write_delay: Option<Duration>,
    prepare_delay: Option<Duration>,
}

/// Shared-state session double; clones observe the same state
#[derive(Clone, Default)]
pub struct MockSession {
    state: Arc<Mutex<MockInner>>,
}

/// Install a log subscriber once, so failing tests can be rerun with output
#[allow(dead_code)]
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the behavior for a SQL text
    pub fn script(&self, sql: &str, behavior: MockBehavior) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(sql.to_string(), behavior);
    }

    /// Delay every LOB chunk write (to exercise cancellation mid-stream)
    pub fn set_lob_write_delay(&self, delay: Duration) {
        self.state.lock().unwrap().lob_write_delay = Some(delay);
    }

    /// Delay every prepare round-trip
    #[allow(dead_code)]
    pub fn set_prepare_delay(&self, delay: Duration) {
        self.state.lock().unwrap().prepare_delay = Some(delay);
    }

    /// Store LOB data directly and return its locator (fetch-side tests)
    pub fn preload_lob(&self, kind: LobKind, data: &[u8]) -> LobLocator {
        let mut inner = self.state.lock().unwrap();
        inner.next_lob += 1;
        let key = inner.next_lob.to_be_bytes().to_vec();
        inner.lobs.insert(
            key.clone(),
            MockLob {
                data: data.to_vec(),
                closed: false,
            },
        );
        LobLocator::new(Bytes::from(key), kind, data.len() as u64)
    }

    /// Number of out-of-band breaks issued
    pub fn breaks(&self) -> u32 {
        self.state.lock().unwrap().breaks
    }

    /// How many times a handle was closed
    pub fn close_count(&self, handle: NativeHandle) -> u32 {
        self.state
            .lock()
            .unwrap()
            .close_counts
            .get(&handle.0)
            .copied()
            .unwrap_or(0)
    }

    /// Check every LOB locator has been closed
    pub fn all_lobs_closed(&self) -> bool {
        let inner = self.state.lock().unwrap();
        inner.lobs.values().all(|lob| lob.closed)
    }

    /// Committed transaction count
    pub fn commits(&self) -> u32 {
        self.state.lock().unwrap().commits
    }

    /// Rolled-back transaction count
    pub fn rollbacks(&self) -> u32 {
        self.state.lock().unwrap().rollbacks
    }

    fn build_echo_row(binds: &[(u16, Option<Vec<u8>>)]) -> Bytes {
        let mut sorted: Vec<_> = binds.to_vec();
        sorted.sort_by_key(|(position, _)| *position);
        let mut buf = WriteBuffer::new();
        for (_, wire) in &sorted {
            buf.write_value_slice(wire.as_deref());
        }
        buf.freeze()
    }
}

impl NativeSession for MockSession {
    fn prepare(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<(NativeHandle, Vec<ColumnInfo>)>> + Send {
        let state = Arc::clone(&self.state);
        let sql = sql.to_string();
        async move {
            let delay = state.lock().unwrap().prepare_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut inner = state.lock().unwrap();
            let behavior = inner
                .scripts
                .get(&sql)
                .cloned()
                .unwrap_or(MockBehavior::Affected(0));

            if let MockBehavior::PrepareError(message) = &behavior {
                return Err(Error::Prepare(message.clone()));
            }

            let columns = match &behavior {
                MockBehavior::EchoBinds(columns) | MockBehavior::Rows(columns, _) => {
                    columns.clone()
                }
                _ => Vec::new(),
            };

            inner.next_handle += 1;
            let handle = NativeHandle(inner.next_handle);
            inner.statements.insert(
                handle.0,
                MockStatement {
                    behavior: Some(behavior),
                    ..Default::default()
                },
            );
            Ok((handle, columns))
        }
    }

    fn bind(
        &self,
        handle: NativeHandle,
        position: u16,
        value: &EncodedValue,
    ) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        let wire = value.wire_bytes();
        async move {
            let mut inner = state.lock().unwrap();
            let statement = inner
                .statements
                .get_mut(&handle.0)
                .ok_or(Error::BadConnection)?;
            statement.binds.push((position, wire));
            Ok(())
        }
    }

    fn execute(&self, handle: NativeHandle) -> impl Future<Output = Result<ExecuteOutcome>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let (behavior, binds) = {
                let mut inner = state.lock().unwrap();
                let statement = inner
                    .statements
                    .get_mut(&handle.0)
                    .ok_or(Error::BadConnection)?;
                let behavior = statement.behavior.clone().ok_or(Error::BadConnection)?;
                let binds = std::mem::take(&mut statement.binds);
                (behavior, binds)
            };

            match behavior {
                MockBehavior::EchoBinds(_) => {
                    let row = Self::build_echo_row(&binds);
                    let mut inner = state.lock().unwrap();
                    if let Some(statement) = inner.statements.get_mut(&handle.0) {
                        statement.pending_rows = VecDeque::from(vec![row]);
                    }
                    Ok(ExecuteOutcome::RowsAvailable)
                }
                MockBehavior::Rows(_, rows) => {
                    let mut inner = state.lock().unwrap();
                    if let Some(statement) = inner.statements.get_mut(&handle.0) {
                        statement.pending_rows = rows.into_iter().collect();
                    }
                    Ok(ExecuteOutcome::RowsAvailable)
                }
                MockBehavior::Affected(count) => Ok(ExecuteOutcome::Affected(count)),
                MockBehavior::SlowAffected(delay, count) => {
                    tokio::time::sleep(delay).await;
                    Ok(ExecuteOutcome::Affected(count))
                }
                MockBehavior::PrepareError(_) => Err(Error::BadConnection),
            }
        }
    }

    fn fetch(&self, handle: NativeHandle) -> impl Future<Output = Result<Option<Bytes>>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let mut inner = state.lock().unwrap();
            let statement = inner
                .statements
                .get_mut(&handle.0)
                .ok_or(Error::BadConnection)?;
            Ok(statement.pending_rows.pop_front())
        }
    }

    fn break_call(&self, _handle: NativeHandle) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.lock().unwrap().breaks += 1;
            Ok(())
        }
    }

    fn close(&self, handle: NativeHandle) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let mut inner = state.lock().unwrap();
            *inner.close_counts.entry(handle.0).or_insert(0) += 1;
            inner.statements.remove(&handle.0);
            Ok(())
        }
    }

    fn create_lob(&self, kind: LobKind) -> impl Future<Output = Result<LobLocator>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let mut inner = state.lock().unwrap();
            inner.next_lob += 1;
            let key = inner.next_lob.to_be_bytes().to_vec();
            inner.lobs.insert(
                key.clone(),
                MockLob {
                    data: Vec::new(),
                    closed: false,
                },
            );
            Ok(LobLocator::new(Bytes::from(key), kind, 0))
        }
    }

    fn read_lob_chunk(
        &self,
        locator: &LobLocator,
        offset: u64,
        len: usize,
    ) -> impl Future<Output = Result<Bytes>> + Send {
        let state = Arc::clone(&self.state);
        let key = locator.as_bytes().to_vec();
        async move {
            let inner = state.lock().unwrap();
            let lob = inner.lobs.get(&key).ok_or(Error::BadConnection)?;
            let start = (offset as usize).min(lob.data.len());
            let end = (start + len).min(lob.data.len());
            Ok(Bytes::copy_from_slice(&lob.data[start..end]))
        }
    }

    fn write_lob_chunk(
        &self,
        locator: &LobLocator,
        offset: u64,
        data: &[u8],
    ) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        let key = locator.as_bytes().to_vec();
        let data = data.to_vec();
        async move {
            let delay = state.lock().unwrap().lob_write_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mut inner = state.lock().unwrap();
            let lob = inner.lobs.get_mut(&key).ok_or(Error::BadConnection)?;
            let end = offset as usize + data.len();
            if lob.data.len() < end {
                lob.data.resize(end, 0);
            }
            lob.data[offset as usize..end].copy_from_slice(&data);
            Ok(())
        }
    }

    fn close_lob(&self, locator: &LobLocator) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        let key = locator.as_bytes().to_vec();
        async move {
            let mut inner = state.lock().unwrap();
            if let Some(lob) = inner.lobs.get_mut(&key) {
                lob.closed = true;
            }
            Ok(())
        }
    }

    fn commit(&self) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.lock().unwrap().commits += 1;
            Ok(())
        }
    }

    fn rollback(&self) -> impl Future<Output = Result<()>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.lock().unwrap().rollbacks += 1;
            Ok(())
        }
    }
}
