//! Document memoization for the rendering pipeline.
//!
//! Maps (page name, version, plugin-execution flag) to parsed documents so
//! repeat views skip the parse stage. Entries expire on a configurable
//! horizon (24h by default) and the store is LRU-bounded. Invalidation is
//! driven by page-save events through the rendering manager.

pub mod keys;
pub(crate) mod lock;
mod store;

pub(crate) use store::{METRIC_CACHE_EVICT, METRIC_CACHE_EXPIRED, METRIC_CACHE_HIT, METRIC_CACHE_MISS};

pub use keys::{DocumentKey, VERSION_DELIMITER};
pub use store::DocumentCache;
