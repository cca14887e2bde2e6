//! Result cache.
//!
//! Memoizes extraction results keyed by content fingerprint. Both
//! bounds apply at once: entries older than the TTL are treated as
//! misses and purged lazily on lookup, and capacity pressure on insert
//! evicts the least-recently-used entry (ties broken by oldest
//! creation). A capacity of zero disables the cache entirely; every
//! call is a miss and nothing is stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::result::ExtractionResult;

struct CacheEntry {
    result: Arc<ExtractionResult>,
    created: Instant,
    /// Logical access clock value at the last get/put of this entry.
    last_access: u64,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Monotonic access counter; cheaper and steadier than wall-clock
    /// recency under concurrent load.
    clock: u64,
}

/// TTL plus LRU bounded cache, safe for concurrent use.
pub(crate) struct ResultCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<CacheInner>,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                clock: 0,
            }),
        }
    }

    /// A poisoned mutex only means another thread panicked mid-update;
    /// the map itself is still structurally sound, so keep serving.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Look up a fingerprint. Expired entries count as misses and are
    /// purged on the spot.
    pub fn get(&self, fingerprint: &str) -> Option<Arc<ExtractionResult>> {
        if self.capacity == 0 {
            return None;
        }

        let mut inner = self.lock();
        inner.clock += 1;
        let clock = inner.clock;

        let expired = match inner.entries.get_mut(fingerprint) {
            Some(entry) => {
                if entry.created.elapsed() >= self.ttl {
                    true
                } else {
                    entry.last_access = clock;
                    return Some(Arc::clone(&entry.result));
                }
            }
            None => return None,
        };

        if expired {
            inner.entries.remove(fingerprint);
        }
        None
    }

    /// Store a result. On capacity pressure, expired entries are purged
    /// first; if the cache is still full, the least-recently-used entry
    /// is evicted, ties broken by oldest creation time.
    pub fn put(&self, fingerprint: String, result: Arc<ExtractionResult>) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.lock();
        inner.clock += 1;
        let clock = inner.clock;

        if !inner.entries.contains_key(&fingerprint) && inner.entries.len() >= self.capacity {
            let ttl = self.ttl;
            inner.entries.retain(|_, entry| entry.created.elapsed() < ttl);

            while inner.entries.len() >= self.capacity {
                let victim = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| (entry.last_access, entry.created))
                    .map(|(key, _)| key.clone());
                match victim {
                    Some(key) => {
                        inner.entries.remove(&key);
                    }
                    None => break,
                }
            }
        }

        inner.entries.insert(
            fingerprint,
            CacheEntry {
                result,
                created: Instant::now(),
                last_access: clock,
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().entries.len()
    }
}
