//! Bounded, thread-safe key/value stores
//!
//! [`BoundedStore`] is the shared building block: an LRU map behind a mutex
//! with hit/miss counters. [`ResourceCache`] keys it by resource address and
//! is the cache handed to the image loader. The transport's response cache
//! reuses the same store with a request-shaped key.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use lru::LruCache;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::stats::{CacheStats, StatCounters};

/// Capacity-bounded LRU map safe to share between tasks
///
/// Every operation takes the internal lock for a short, non-async critical
/// section. A get followed by a put is not atomic: two tasks racing on the
/// same missing key may both fill it, and the last writer wins.
#[derive(Debug)]
pub struct BoundedStore<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, V>>,
    counters: StatCounters,
}

impl<K: Hash + Eq, V: Clone> BoundedStore<K, V> {
    /// Create a store holding at most `capacity` entries (a zero capacity holds one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            counters: StatCounters::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, V>> {
        // Poisoning is ignored: entries are independent and may vanish anyway
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a value, marking it as most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = self.lock().get(key).cloned();
        match found {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        found
    }

    /// Check for a key without touching recency or counters
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().contains(key)
    }

    /// Insert or overwrite a value, returning true when another entry was evicted
    pub fn put(&self, key: K, value: V) -> bool {
        let mut entries = self.lock();
        let will_evict = !entries.contains(&key) && entries.len() == entries.cap().get();
        entries.put(key, value);
        drop(entries);

        self.counters.record_insertion();
        if will_evict {
            self.counters.record_eviction();
        }
        will_evict
    }

    /// Remove a value, returning it if present
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().pop(key)
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Snapshot of the store's counters
    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = {
            let guard = self.lock();
            (guard.len(), guard.cap().get())
        };
        self.counters.snapshot(entries, capacity)
    }
}

/// Process-wide cache of fetched payloads keyed by resource address
///
/// The cache is non-authoritative: an entry may be evicted at any time and
/// callers must always be able to fetch again. It is constructed explicitly
/// and shared through `Arc` by whoever composes the loader.
#[derive(Debug)]
pub struct ResourceCache<V = Bytes> {
    store: BoundedStore<String, V>,
}

impl<V: Clone> ResourceCache<V> {
    /// Create a cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        debug!("Creating resource cache with capacity {}", config.capacity);
        Self {
            store: BoundedStore::new(config.capacity),
        }
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(&CacheConfig::with_capacity(capacity))
    }

    /// Return the cached value for `key`, if any; a miss is not an error
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.store.get(key);
        trace!(key, hit = value.is_some(), "resource cache lookup");
        value
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        if self.store.put(key.clone(), value) {
            debug!(key = %key, "resource cache evicted an entry");
        }
    }

    /// Remove the value for `key`
    pub fn remove(&self, key: &str) -> Option<V> {
        self.store.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

impl<V: Clone> Default for ResourceCache<V> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
