//! Compiled pattern cache.
//!
//! # Responsibilities
//! - Memoize pattern source → compiled [`AnchoredPattern`]
//! - Share compiled patterns across request-handling threads
//!
//! # Design Decisions
//! - A `DashMap`: each lookup and each insert is atomic on its own, the pair is not
//! - Compilation runs outside the map; two first-time callers may both compile and the last insert wins
//! - Failed compilations are returned to the caller and never stored

use std::sync::Arc;

use dashmap::DashMap;

use crate::observability::metrics;
use crate::routing::pattern::AnchoredPattern;
use crate::routing::types::RoutingResult;

/// Thread-safe memoization of compiled patterns, one per routing-tree owner.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: DashMap<String, Arc<AnchoredPattern>>,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, compiling and storing it with `compile` on a miss.
    pub fn get_or_compile<F>(&self, key: &str, compile: F) -> RoutingResult<Arc<AnchoredPattern>>
    where
        F: FnOnce() -> RoutingResult<AnchoredPattern>,
    {
        if let Some(pattern) = self.get(key) {
            metrics::record_pattern_cache(true);
            return Ok(pattern);
        }

        metrics::record_pattern_cache(false);
        let pattern = Arc::new(compile()?);
        tracing::debug!(pattern = %key, groups = pattern.group_count(), "Compiled route pattern");

        self.entries.insert(key.to_string(), pattern.clone());
        metrics::record_pattern_cache_size(self.entries.len());

        Ok(pattern)
    }

    /// Compile `source` as a segment-anchored pattern, keyed by the source itself.
    pub fn compile(&self, source: &str) -> RoutingResult<Arc<AnchoredPattern>> {
        self.get_or_compile(source, || AnchoredPattern::new(source))
    }

    /// Cached pattern for `key`, if present.
    pub fn get(&self, key: &str) -> Option<Arc<AnchoredPattern>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
