//! Reference-index collaborator seam.
//!
//! The rendering core does not maintain the link graph itself; it asks an
//! external index which pages refer to a given page when deciding what to
//! invalidate after a save. A lookup failure is never fatal to invalidation.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::cache::lock::{rw_read, rw_write};
use crate::domain::PageName;

const SOURCE: &str = "refs";

#[derive(Debug, Clone, Error)]
#[error("reference index unavailable: {message}")]
pub struct ReferenceIndexError {
    pub message: String,
}

impl ReferenceIndexError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Resolves which pages link to a given page.
pub trait ReferenceIndex: Send + Sync {
    fn find_referrers(&self, page: &PageName) -> Result<Vec<PageName>, ReferenceIndexError>;
}

/// In-memory referrer table for embedders and tests.
#[derive(Default)]
pub struct InMemoryReferenceIndex {
    referrers: RwLock<HashMap<PageName, Vec<PageName>>>,
}

impl InMemoryReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `referrer` links to `target`. Duplicate records are kept
    /// out of the table.
    pub fn record(&self, target: PageName, referrer: PageName) {
        let mut table = rw_write(&self.referrers, SOURCE, "record");
        let entry = table.entry(target).or_default();
        if !entry.contains(&referrer) {
            entry.push(referrer);
        }
    }

    /// Drop every recorded reference to `target`.
    pub fn forget(&self, target: &PageName) {
        rw_write(&self.referrers, SOURCE, "forget").remove(target);
    }
}

impl ReferenceIndex for InMemoryReferenceIndex {
    fn find_referrers(&self, page: &PageName) -> Result<Vec<PageName>, ReferenceIndexError> {
        let table = rw_read(&self.referrers, SOURCE, "find_referrers");
        Ok(table.get(page).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(name: &str) -> PageName {
        PageName::new(name).expect("valid page name")
    }

    #[test]
    fn unknown_pages_have_no_referrers() {
        let index = InMemoryReferenceIndex::new();
        let referrers = index.find_referrers(&page("Home")).expect("lookup succeeds");
        assert!(referrers.is_empty());
    }

    #[test]
    fn records_deduplicate() {
        let index = InMemoryReferenceIndex::new();
        index.record(page("Home"), page("Sandbox"));
        index.record(page("Home"), page("Sandbox"));
        index.record(page("Home"), page("About"));

        let referrers = index.find_referrers(&page("Home")).expect("lookup succeeds");
        assert_eq!(referrers, vec![page("Sandbox"), page("About")]);
    }

    #[test]
    fn forget_drops_the_target() {
        let index = InMemoryReferenceIndex::new();
        index.record(page("Home"), page("Sandbox"));
        index.forget(&page("Home"));
        assert!(
            index
                .find_referrers(&page("Home"))
                .expect("lookup succeeds")
                .is_empty()
        );
    }
}
