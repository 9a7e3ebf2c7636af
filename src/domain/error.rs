use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("invalid page name `{name}`: {reason}")]
    InvalidPageName { name: String, reason: &'static str },
}

impl DomainError {
    pub(crate) fn invalid_page_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPageName {
            name: name.into(),
            reason,
        }
    }
}
