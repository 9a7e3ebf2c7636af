//! Document cache key construction.
//!
//! Keys concatenate page name, version and plugin flag with a reserved
//! delimiter. `PageName` validation guarantees the delimiter never appears
//! inside a name, so keys parse unambiguously.

use std::fmt;

use crate::domain::{PageName, PageVersion, PluginFlag};

/// Reserved separator between the key's identity fields.
pub const VERSION_DELIMITER: &str = "::";

/// Key addressing one memoized parsed document.
///
/// Two shapes exist: the versioned form `<name>::<version>::<flag>` written
/// by render calls, and the bare page name written only by commit
/// invalidation. The bare form is kept for compatibility with the historical
/// invalidation behavior; see `RenderingManager::page_event`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Key for a specific (page, version, plugin flag) combination.
    pub fn versioned(page: &PageName, version: PageVersion, flag: PluginFlag) -> Self {
        Self(format!(
            "{page}{VERSION_DELIMITER}{version}{VERSION_DELIMITER}{flag}"
        ))
    }

    /// Key for the latest stored revision of a page under the given flag.
    pub fn latest(page: &PageName, flag: PluginFlag) -> Self {
        Self::versioned(page, PageVersion::Latest, flag)
    }

    /// Bare page-name key, used only on the commit invalidation path.
    pub fn bare(page: &PageName) -> Self {
        Self(page.as_str().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(name: &str) -> PageName {
        PageName::new(name).expect("valid page name")
    }

    #[test]
    fn versioned_key_format() {
        let key = DocumentKey::versioned(&page("Home"), PageVersion::Numbered(3), PluginFlag::Disabled);
        assert_eq!(key.as_str(), "Home::3::false");
    }

    #[test]
    fn latest_key_uses_minus_one() {
        let key = DocumentKey::latest(&page("Sandbox"), PluginFlag::Unspecified);
        assert_eq!(key.as_str(), "Sandbox::-1::null");
    }

    #[test]
    fn bare_key_is_just_the_name() {
        let key = DocumentKey::bare(&page("Home"));
        assert_eq!(key.as_str(), "Home");
        assert_ne!(
            key,
            DocumentKey::versioned(&page("Home"), PageVersion::Numbered(3), PluginFlag::Disabled)
        );
    }

    #[test]
    fn distinct_flags_produce_distinct_keys() {
        let name = page("Main");
        let keys: Vec<DocumentKey> = PluginFlag::ALL
            .iter()
            .map(|flag| DocumentKey::latest(&name, *flag))
            .collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }
}
