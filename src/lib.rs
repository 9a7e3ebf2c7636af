//! Folia page-rendering core
//!
//! The engine room of a self-hosted wiki: stored wiki markup goes in, HTML
//! (or WYSIWYG-editable markup) comes out, and parsed documents are memoized
//! per page revision in between.
//!
//! - **markup**: raw page text → structured document tree
//! - **render**: document tree → output string, plus the [`RenderingManager`]
//!   facade external callers go through
//! - **cache**: (page, version, plugin-flag) → parsed document, with
//!   staleness checks, TTL expiry and LRU eviction
//! - **events** / **refs**: the seams through which the page store drives
//!   invalidation
//!
//! ## Configuration
//!
//! Behavior is controlled via `folia.toml` (or `FOLIA__*` environment
//! variables):
//!
//! ```toml
//! [rendering]
//! parser = "wiki"
//! renderer = "xhtml"
//! wysiwyg_renderer = "wysiwyg"
//!
//! [cache]
//! enabled = true
//! capacity = 1000
//! expiry_seconds = 86400
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use folia::config::{CacheSettings, RenderingSettings};
//! use folia::domain::{PageName, PageVersion};
//! use folia::refs::InMemoryReferenceIndex;
//! use folia::{RenderingContext, RenderingManager};
//!
//! let manager = RenderingManager::initialize(
//!     &RenderingSettings::default(),
//!     &CacheSettings::default(),
//!     Arc::new(InMemoryReferenceIndex::new()),
//! )
//! .expect("built-in components resolve");
//!
//! let context = RenderingContext::new(PageName::new("Home").unwrap())
//!     .with_version(PageVersion::Numbered(1));
//! let document = manager
//!     .rendered_document(&context, "__Hello__")
//!     .expect("parse succeeds");
//! let html = manager.html(&context, &document).expect("render succeeds");
//! assert_eq!(html, "<p><strong>Hello</strong></p>\n");
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod events;
pub mod markup;
pub mod refs;
pub mod render;
pub mod telemetry;

pub use render::{RenderingContext, RenderingManager};
