//! Executor configuration
//!
//! All tunables are carried by an explicit [`ExecutorConfig`] value handed
//! to the executor at construction. The core keeps no process-wide mutable
//! state.

use std::time::Duration;

/// Default chunk size for LOB streaming, in bytes
pub const DEFAULT_LOB_CHUNK_SIZE: usize = 8192;

/// Default threshold above which a bind value is streamed as a LOB
/// instead of sent inline
pub const DEFAULT_LOB_INLINE_THRESHOLD: usize = 32 * 1024;

/// Default parse-cache capacity (matches the statement cache default of
/// python-oracledb)
pub const DEFAULT_PARSE_CACHE_SIZE: usize = 20;

/// Configuration for a statement executor.
///
/// # Example
///
/// ```rust
/// use orawire::ExecutorConfig;
/// use std::time::Duration;
///
/// let config = ExecutorConfig::new()
///     .with_lob_chunk_size(16 * 1024)
///     .with_call_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Chunk size used when streaming LOB reads and writes
    pub lob_chunk_size: usize,
    /// Bind values longer than this are streamed through a LOB locator
    pub lob_inline_threshold: usize,
    /// Capacity of the SQL parse cache (0 disables caching)
    pub parse_cache_size: usize,
    /// Deadline applied to every call that does not carry its own
    pub call_timeout: Option<Duration>,
}

impl ExecutorConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            lob_chunk_size: DEFAULT_LOB_CHUNK_SIZE,
            lob_inline_threshold: DEFAULT_LOB_INLINE_THRESHOLD,
            parse_cache_size: DEFAULT_PARSE_CACHE_SIZE,
            call_timeout: None,
        }
    }

    /// Set the LOB streaming chunk size
    pub fn with_lob_chunk_size(mut self, size: usize) -> Self {
        self.lob_chunk_size = size.max(1);
        self
    }

    /// Set the inline threshold above which binds are streamed as LOBs
    pub fn with_lob_inline_threshold(mut self, size: usize) -> Self {
        self.lob_inline_threshold = size;
        self
    }

    /// Set the parse-cache capacity (0 disables caching)
    pub fn with_parse_cache_size(mut self, size: usize) -> Self {
        self.parse_cache_size = size;
        self
    }

    /// Set a default deadline for every executor call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new()
    }
}
