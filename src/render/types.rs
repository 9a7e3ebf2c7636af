//! Rendering contract shared by renderer implementations.

use thiserror::Error;

/// Produces the final string output for one (context, document) pair.
///
/// Implementations are constructed already bound to their inputs; `render`
/// may be called repeatedly and must be deterministic.
pub trait Renderer {
    fn render(&self) -> Result<String, RenderError>;
}

/// Failures surfaced while producing renderer output.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("output assembly failed: {message}")]
    Output { message: String },
    #[error("renderer failed: {message}")]
    Execution { message: String },
}

impl RenderError {
    pub(crate) fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for RenderError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}
