//! Bounded memo tables owned by a template session
//!
//! Two caches live inside every [`HtmlTemplate`](crate::HtmlTemplate): the
//! render cache (template alias to rendered output) and the segment cache
//! (template body text to its token list). Neither is shared between
//! sessions, because occurrence counts are specific to one session.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

/// Cache entry with access bookkeeping for eviction
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
    pub access_count: usize,
    pub last_accessed: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            access_count: 0,
            last_accessed: now,
        }
    }

    /// Mark this entry as accessed
    pub fn mark_accessed(&mut self) {
        self.access_count += 1;
        self.last_accessed = Instant::now();
    }
}

/// Cache eviction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionStrategy {
    /// Least Recently Used
    LRU,
    /// Least Frequently Used
    LFU,
    /// First In, First Out
    FIFO,
}

/// Size-bounded cache with configurable eviction
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    max_size: usize,
    eviction_strategy: EvictionStrategy,
    hits: usize,
    misses: usize,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(max_size: usize, eviction_strategy: EvictionStrategy) -> Self {
        Self {
            entries: HashMap::new(),
            max_size,
            eviction_strategy,
            hits: 0,
            misses: 0,
        }
    }

    /// Insert a value, evicting one entry first if the cache is full
    ///
    /// A cache with `max_size` 0 stores nothing.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.max_size == 0 {
            return None;
        }
        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict_one();
        }

        self.entries
            .insert(key, CacheEntry::new(value))
            .map(|old_entry| old_entry.value)
    }

    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.mark_accessed();
                self.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every entry; hit and miss counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
            entry_count: self.entries.len(),
            max_size: self.max_size,
        }
    }

    fn evict_one(&mut self) {
        let key_to_remove = match self.eviction_strategy {
            EvictionStrategy::LRU => self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(k, _)| k.clone()),
            EvictionStrategy::LFU => self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.access_count)
                .map(|(k, _)| k.clone()),
            EvictionStrategy::FIFO => self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(k, _)| k.clone()),
        };

        if let Some(key) = key_to_remove {
            self.entries.remove(&key);
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub entry_count: usize,
    pub max_size: usize,
}

/// Statistics for both caches of one session
#[derive(Debug, Clone, Default)]
pub struct SessionCacheStats {
    pub rendered: CacheStats,
    pub segments: CacheStats,
}

impl SessionCacheStats {
    pub fn total_entries(&self) -> usize {
        self.rendered.entry_count + self.segments.entry_count
    }
}
