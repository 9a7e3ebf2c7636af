//! Rendering: structured document trees to output strings, plus the facade
//! callers go through.

mod context;
mod manager;
mod registry;
mod types;
mod wysiwyg;
mod xhtml;

pub(crate) use manager::{METRIC_PARSE, METRIC_RENDER_MS};

pub use context::RenderingContext;
pub use manager::{ConfigurationError, RenderingManager};
pub use registry::{
    DEFAULT_RENDERER, DEFAULT_WYSIWYG_RENDERER, RendererFactory, RendererInstantiationError,
    RendererRegistry,
};
pub use types::{RenderError, Renderer};
pub use wysiwyg::WysiwygRenderer;
pub use xhtml::XhtmlRenderer;
