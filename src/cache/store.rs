//! Parsed-document cache storage.
//!
//! In-memory LRU store keyed by [`DocumentKey`], with a per-entry expiry
//! horizon measured from insertion. Entries hold shared handles to immutable
//! parsed documents; the store never performs I/O and never errors.

use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;

use crate::markup::ParsedDocument;

use super::keys::DocumentKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub(crate) const METRIC_CACHE_HIT: &str = "folia_document_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "folia_document_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "folia_document_cache_evict_total";
pub(crate) const METRIC_CACHE_EXPIRED: &str = "folia_document_cache_expired_total";

struct CacheEntry {
    document: Arc<ParsedDocument>,
    inserted_at: Instant,
}

/// LRU document cache with time-based expiry.
///
/// Lookups move entries to the front; capacity overflow evicts the least
/// recently used entry. An entry older than the expiry horizon is treated as
/// absent and dropped on access.
pub struct DocumentCache {
    entries: RwLock<LruCache<DocumentKey, CacheEntry>>,
    expiry: Duration,
}

impl DocumentCache {
    pub fn new(capacity: NonZeroUsize, expiry: Duration) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            expiry,
        }
    }

    /// Look up a document. Expired entries are removed and reported absent.
    pub fn get(&self, key: &DocumentKey) -> Option<Arc<ParsedDocument>> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let expired = match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.expiry => {
                counter!(METRIC_CACHE_HIT).increment(1);
                return Some(Arc::clone(&entry.document));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
            counter!(METRIC_CACHE_EXPIRED).increment(1);
        }
        counter!(METRIC_CACHE_MISS).increment(1);
        None
    }

    /// Insert or replace a document. Evicts the oldest entry at capacity.
    pub fn put(&self, key: DocumentKey, document: Arc<ParsedDocument>) {
        let entry = CacheEntry {
            document,
            inserted_at: Instant::now(),
        };
        let evicted = rw_write(&self.entries, SOURCE, "put").push(key.clone(), entry);
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                counter!(METRIC_CACHE_EVICT).increment(1);
            }
        }
    }

    /// Remove an entry. Absent keys are a no-op.
    pub fn remove(&self, key: &DocumentKey) {
        rw_write(&self.entries, SOURCE, "remove").pop(key);
    }

    /// Number of stored entries, including any not yet expired-on-access.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
