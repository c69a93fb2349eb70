//! Bounded, time-expiring result cache shared by every derived computation.
//!
//! One [`ResultCache`] instance is created by the caller and injected (as an
//! `Arc`) into the query resolver and the enrichment service. Entries are
//! evicted by capacity (least-recently-used first) and treated as absent once
//! older than the TTL; expired entries are purged lazily on lookup.
//!
//! Cache keys are built by callers and must encode every input that affects
//! the cached result.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;
use tracing::trace;

use crate::config::CacheConfig;
use crate::models::{Category, Note, Sentiment};

/// A cached result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Text(String),
    List(Vec<String>),
    Sentiment(Sentiment),
    Categories(Vec<Category>),
    Notes(Vec<Note>),
}

#[derive(Debug)]
struct Entry {
    value: Arc<CachedValue>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache with a uniform TTL.
///
/// Values are stored behind an `Arc`; the lock is held only for the LRU
/// bookkeeping and a refcount bump, never for copying a value. Never errors;
/// a poisoned lock is recovered.
pub struct ResultCache {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Duration,
}

impl ResultCache {
    /// Create a cache from configuration. A zero capacity is raised to one.
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl(),
        }
    }

    /// Create a cache with the default capacity (500) and TTL (24 hours).
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a live entry, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<Arc<CachedValue>> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(Arc::clone(&entry.value));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            trace!(key, "Purging expired cache entry");
            entries.pop(key);
        }
        None
    }

    /// Store or overwrite an entry, resetting its age.
    ///
    /// When the cache is full and `key` is new, the least-recently-used entry
    /// is evicted first.
    pub fn put(&self, key: impl Into<String>, value: CachedValue) {
        let key = key.into();
        let mut entries = self.lock();
        let entry = Entry {
            value: Arc::new(value),
            inserted_at: Instant::now(),
        };
        if let Some((evicted, _)) = entries.push(key.clone(), entry) {
            if evicted != key {
                trace!(evicted = %evicted, "Evicted least-recently-used cache entry");
            }
        }
    }

    /// Whether a live entry exists. Does not change recency.
    pub fn contains(&self, key: &str) -> bool {
        self.lock()
            .peek(key)
            .is_some_and(|entry| entry.inserted_at.elapsed() < self.ttl)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    pub fn get_text(&self, key: &str) -> Option<String> {
        match &*self.get(key)? {
            CachedValue::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        match &*self.get(key)? {
            CachedValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }

    pub fn get_sentiment(&self, key: &str) -> Option<Sentiment> {
        match &*self.get(key)? {
            CachedValue::Sentiment(sentiment) => Some(*sentiment),
            _ => None,
        }
    }

    pub fn get_categories(&self, key: &str) -> Option<Vec<Category>> {
        match &*self.get(key)? {
            CachedValue::Categories(categories) => Some(categories.clone()),
            _ => None,
        }
    }

    pub fn get_notes(&self, key: &str) -> Option<Vec<Note>> {
        match &*self.get(key)? {
            CachedValue::Notes(notes) => Some(notes.clone()),
            _ => None,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("ttl", &self.ttl)
            .finish()
    }
}
