//! Parse cache for statement shapes
//!
//! Scanning SQL for its kind and bind markers is pure client-side work, so
//! the result is cached by SQL text. Hot statements prepared many times (the
//! expected pattern for a prepared-statement workload) skip re-scanning.
//! The cached shape is immutable and shared; server-side handles are per
//! prepare call and are never cached here.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::statement::Statement;

/// LRU cache of parsed statement shapes keyed by SQL text
#[derive(Debug)]
pub struct StatementCache {
    /// IndexMap gives O(1) lookup plus insertion-order iteration for LRU
    cache: IndexMap<String, Arc<Statement>>,
    max_size: usize,
}

impl StatementCache {
    /// Create a cache with the given capacity; 0 disables caching
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: IndexMap::with_capacity(max_size),
            max_size,
        }
    }

    /// Number of cached statements
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get the parsed shape for this SQL, parsing and caching on miss
    pub fn get_or_parse(&mut self, sql: &str) -> Arc<Statement> {
        if self.max_size == 0 {
            return Arc::new(Statement::new(sql));
        }

        if let Some(cached) = self.cache.get(sql) {
            let statement = Arc::clone(cached);
            // Move to the back so eviction hits the least recently used
            self.cache.shift_remove(sql);
            self.cache.insert(sql.to_string(), Arc::clone(&statement));
            tracing::trace!(sql = sql, "parse cache hit");
            return statement;
        }

        tracing::trace!(sql = sql, "parse cache miss");
        let statement = Arc::new(Statement::new(sql));
        if self.cache.len() >= self.max_size {
            self.cache.shift_remove_index(0);
        }
        self.cache.insert(sql.to_string(), Arc::clone(&statement));
        statement
    }

    /// Drop every cached shape
    pub fn clear(&mut self) {
        self.cache.clear();
        tracing::debug!("parse cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_shape() {
        let mut cache = StatementCache::new(4);
        let first = cache.get_or_parse("SELECT :1 FROM dual");
        let second = cache.get_or_parse("SELECT :1 FROM dual");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(second.parameter_count(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = StatementCache::new(2);
        let a = cache.get_or_parse("SELECT 1 FROM dual");
        cache.get_or_parse("SELECT 2 FROM dual");
        // Touch the first so the second becomes least recently used
        cache.get_or_parse("SELECT 1 FROM dual");
        cache.get_or_parse("SELECT 3 FROM dual");
        assert_eq!(cache.len(), 2);

        let a_again = cache.get_or_parse("SELECT 1 FROM dual");
        assert!(Arc::ptr_eq(&a, &a_again));
        // The evicted statement re-parses into a fresh shape
        let b_again = cache.get_or_parse("SELECT 2 FROM dual");
        assert_eq!(b_again.sql(), "SELECT 2 FROM dual");
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = StatementCache::new(0);
        let first = cache.get_or_parse("SELECT 1 FROM dual");
        let second = cache.get_or_parse("SELECT 1 FROM dual");
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = StatementCache::new(4);
        cache.get_or_parse("SELECT 1 FROM dual");
        cache.clear();
        assert!(cache.is_empty());
    }
}
