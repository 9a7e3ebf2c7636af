//! Parser selection registry.
//!
//! Maps a configuration name to a factory producing a parser bound to one
//! (context, raw text) pair. Replaces class-name reflection from the era this
//! pipeline descends from: unknown names are visible at initialization and
//! fall back to the built-in default.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::render::RenderingContext;

use super::parser::{MarkupParser, WikiMarkupParser};

/// Name under which the built-in parser is registered.
pub const DEFAULT_PARSER: &str = "wiki";

/// Factory constructing a parser bound to a context and raw page text.
pub type ParserFactory = Arc<
    dyn Fn(&RenderingContext, &str) -> Result<Box<dyn MarkupParser>, ParserInstantiationError>
        + Send
        + Sync,
>;

#[derive(Debug, Clone, Error)]
#[error("markup parser `{name}` could not be instantiated: {message}")]
pub struct ParserInstantiationError {
    pub name: String,
    pub message: String,
}

impl ParserInstantiationError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Registry of named parser factories.
pub struct ParserRegistry {
    factories: HashMap<String, ParserFactory>,
}

impl ParserRegistry {
    /// Registry containing only the built-in wiki parser.
    pub fn builtin() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(DEFAULT_PARSER, |context, raw| {
            Ok(Box::new(WikiMarkupParser::new(context, raw)))
        });
        registry
    }

    /// Register a factory under a configuration name, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&RenderingContext, &str) -> Result<Box<dyn MarkupParser>, ParserInstantiationError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn resolve(&self, name: &str) -> Option<&ParserFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
