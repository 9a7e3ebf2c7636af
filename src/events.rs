//! Page lifecycle events delivered to the rendering core.
//!
//! The collaborator that commits page saves holds a direct handle to every
//! interested [`PageEventListener`] and calls it synchronously; there is no
//! global dispatch. Delivery may happen on a different thread than render
//! calls, which the cache tolerates (the content-identity check in the
//! rendering manager fails closed on stale reads).

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::PageName;

/// What happened to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEventKind {
    /// New page content was committed to storage.
    ContentCommitted { page: PageName },
}

/// A page lifecycle notification.
#[derive(Debug, Clone)]
pub struct PageEvent {
    id: Uuid,
    kind: PageEventKind,
    timestamp: OffsetDateTime,
}

impl PageEvent {
    pub fn content_committed(page: PageName) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: PageEventKind::ContentCommitted { page },
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Unique identifier, usable for idempotent downstream handling.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> &PageEventKind {
        &self.kind
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

/// Receives page events from the save path.
///
/// Implementations must tolerate concurrent delivery and must not fail: a
/// listener that cannot act on an event drops it.
pub trait PageEventListener: Send + Sync {
    fn page_event(&self, event: &PageEvent);
}
