//! Per-request rendering context.

use crate::cache::DocumentKey;
use crate::domain::{PageName, PageVersion, PluginFlag, RequestPurpose};

/// Everything a single rendering request carries.
///
/// Contexts are cheap values built fresh per call; the cache never stores
/// them. The page identity fields (name, version, plugin flag) determine the
/// document cache key, the purpose decides cache eligibility, and the WYSIWYG
/// flag selects the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingContext {
    page: PageName,
    version: PageVersion,
    plugin_flag: PluginFlag,
    purpose: RequestPurpose,
    wysiwyg_editing: bool,
}

impl RenderingContext {
    /// Context for viewing the latest revision of a page.
    pub fn new(page: PageName) -> Self {
        Self {
            page,
            version: PageVersion::Latest,
            plugin_flag: PluginFlag::Unspecified,
            purpose: RequestPurpose::View,
            wysiwyg_editing: false,
        }
    }

    pub fn with_version(mut self, version: PageVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_plugin_flag(mut self, flag: PluginFlag) -> Self {
        self.plugin_flag = flag;
        self
    }

    pub fn with_purpose(mut self, purpose: RequestPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_wysiwyg_editing(mut self, wysiwyg_editing: bool) -> Self {
        self.wysiwyg_editing = wysiwyg_editing;
        self
    }

    pub fn page(&self) -> &PageName {
        &self.page
    }

    pub fn version(&self) -> PageVersion {
        self.version
    }

    pub fn plugin_flag(&self) -> PluginFlag {
        self.plugin_flag
    }

    pub fn purpose(&self) -> RequestPurpose {
        self.purpose
    }

    pub fn wysiwyg_editing(&self) -> bool {
        self.wysiwyg_editing
    }

    /// Cache key for the document this context addresses.
    pub fn document_key(&self) -> DocumentKey {
        DocumentKey::versioned(&self.page, self.version, self.plugin_flag)
    }
}
