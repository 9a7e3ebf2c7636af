//! Renderer selection registry.
//!
//! Same shape as the parser registry: configuration names map to factories
//! producing a renderer bound to one (context, document) pair. Unlike
//! parsers, an unknown configured renderer is fatal at initialization.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::markup::ParsedDocument;

use super::context::RenderingContext;
use super::types::Renderer;
use super::wysiwyg::WysiwygRenderer;
use super::xhtml::XhtmlRenderer;

/// Name under which the built-in HTML renderer is registered.
pub const DEFAULT_RENDERER: &str = "xhtml";

/// Name under which the built-in WYSIWYG renderer is registered.
pub const DEFAULT_WYSIWYG_RENDERER: &str = "wysiwyg";

/// Factory constructing a renderer bound to a context and parsed document.
pub type RendererFactory = Arc<
    dyn Fn(
            &RenderingContext,
            Arc<ParsedDocument>,
        ) -> Result<Box<dyn Renderer>, RendererInstantiationError>
        + Send
        + Sync,
>;

#[derive(Debug, Clone, Error)]
#[error("renderer `{name}` could not be instantiated: {message}")]
pub struct RendererInstantiationError {
    pub name: String,
    pub message: String,
}

impl RendererInstantiationError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Registry of named renderer factories.
pub struct RendererRegistry {
    factories: HashMap<String, RendererFactory>,
}

impl RendererRegistry {
    /// Registry containing the built-in HTML and WYSIWYG renderers.
    pub fn builtin() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(DEFAULT_RENDERER, |context, document| {
            Ok(Box::new(XhtmlRenderer::new(context, document)))
        });
        registry.register(DEFAULT_WYSIWYG_RENDERER, |context, document| {
            Ok(Box::new(WysiwygRenderer::new(context, document)))
        });
        registry
    }

    /// Register a factory under a configuration name, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(
                &RenderingContext,
                Arc<ParsedDocument>,
            ) -> Result<Box<dyn Renderer>, RendererInstantiationError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn resolve(&self, name: &str) -> Option<&RendererFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
