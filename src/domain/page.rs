//! Page identity: validated names and version selectors.

use std::fmt;

use super::error::DomainError;
use crate::cache::keys::VERSION_DELIMITER;

/// Name of a wiki page.
///
/// Names take part in document cache keys, so they must never contain the
/// reserved key delimiter. Construction validates this once; everything
/// downstream can rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageName(String);

impl PageName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_page_name(name, "must not be empty"));
        }
        if name.contains(VERSION_DELIMITER) {
            return Err(DomainError::invalid_page_name(
                name,
                "must not contain the reserved key delimiter",
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PageName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Which stored revision of a page is addressed.
///
/// `Latest` serializes as `-1` in cache keys, matching the page provider's
/// latest-version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageVersion {
    Latest,
    Numbered(u32),
}

impl PageVersion {
    /// The stored revision number, if this selector names one.
    pub fn number(&self) -> Option<u32> {
        match self {
            PageVersion::Latest => None,
            PageVersion::Numbered(version) => Some(*version),
        }
    }
}

impl fmt::Display for PageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageVersion::Latest => f.write_str("-1"),
            PageVersion::Numbered(version) => write!(f, "{version}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        let name = PageName::new("Main Page").expect("valid name");
        assert_eq!(name.as_str(), "Main Page");
    }

    #[test]
    fn rejects_empty_names() {
        assert!(PageName::new("").is_err());
        assert!(PageName::new("   ").is_err());
    }

    #[test]
    fn rejects_names_containing_the_delimiter() {
        let err = PageName::new("Main::Page").expect_err("delimiter must be rejected");
        assert!(matches!(err, DomainError::InvalidPageName { .. }));
    }

    #[test]
    fn latest_version_serializes_as_minus_one() {
        assert_eq!(PageVersion::Latest.to_string(), "-1");
        assert_eq!(PageVersion::Numbered(3).to_string(), "3");
    }

    #[test]
    fn version_number_accessor() {
        assert_eq!(PageVersion::Latest.number(), None);
        assert_eq!(PageVersion::Numbered(7).number(), Some(7));
    }
}
