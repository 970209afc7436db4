//! # Pattern Cache
//!
//! Compiled regular expressions are memoized by pattern text in a bounded
//! [`PatternCache`]. Once the cache holds [`DEFAULT_CAPACITY`] entries, the
//! [`EVICTION_BATCH`] earliest-inserted patterns are dropped before a new one is added
//! (first in, first out; lookups do not refresh an entry).
//!
//! A process-wide cache is available through [`PatternCache::shared`]; callers that
//! want isolation create their own with [`PatternCache::new_shared`] and hand it to
//! [`crate::utils::InputConfigBuilder::pattern_cache`].
use parking_lot::Mutex;
use regex::Regex;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, LazyLock},
};

pub const DEFAULT_CAPACITY: usize = 100;
pub const EVICTION_BATCH: usize = 10;

/// A cache handle that can be cloned into every config that needs it.
pub type SharedPatternCache = Arc<Mutex<PatternCache>>;

static GLOBAL_CACHE: LazyLock<SharedPatternCache> =
    LazyLock::new(|| Arc::new(Mutex::new(PatternCache::default())));

#[derive(Debug)]
pub struct PatternCache {
    capacity: usize,
    order: VecDeque<String>,
    compiled: HashMap<String, Regex>,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PatternCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::with_capacity(capacity),
            compiled: HashMap::with_capacity(capacity),
        }
    }

    /// The process-wide cache.
    pub fn shared() -> SharedPatternCache {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// A fresh cache not shared with anyone else.
    pub fn new_shared() -> SharedPatternCache {
        Arc::new(Mutex::new(PatternCache::default()))
    }

    /// Returns the compiled pattern, compiling and inserting it on a miss.
    /// Patterns that fail to compile are not cached.
    pub fn get_or_compile(&mut self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern)?;

        if self.compiled.len() >= self.capacity {
            self.evict_oldest();
        }

        self.order.push_back(pattern.to_string());
        self.compiled.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    fn evict_oldest(&mut self) {
        let batch = EVICTION_BATCH.min(self.order.len());
        for key in self.order.drain(..batch) {
            self.compiled.remove(&key);
        }
        tracing::trace!(evicted = batch, "pattern cache full");
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.compiled.contains_key(pattern)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
