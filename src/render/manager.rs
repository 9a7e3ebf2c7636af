//! Facade over parsing, rendering and the document cache.
//!
//! External callers go through this manager instead of driving parsers and
//! renderers directly; it memoizes parsed documents per page revision and
//! invalidates memoized results when pages (or pages referring to them)
//! change. Construction is the one-way initialization step: a manager that
//! exists is ready for concurrent use.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cache::{DocumentCache, DocumentKey};
use crate::config::{CacheSettings, RenderingSettings};
use crate::domain::{PluginFlag, RequestPurpose};
use crate::events::{PageEvent, PageEventKind, PageEventListener};
use crate::markup::{DEFAULT_PARSER, MarkupParser, ParsedDocument, ParserRegistry, WikiMarkupParser};
use crate::refs::ReferenceIndex;

use super::context::RenderingContext;
use super::registry::RendererRegistry;
use super::types::{RenderError, Renderer};

pub(crate) const METRIC_PARSE: &str = "folia_parse_total";
pub(crate) const METRIC_RENDER_MS: &str = "folia_render_ms";

/// Initialization failures.
///
/// Only renderers are fatal here: a misconfigured parser falls back to the
/// built-in default, and a misconfigured cache degrades to pass-through.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("configured renderer `{name}` is not registered")]
    UnknownRenderer { name: String },
}

/// Facade wiring parser, renderers and the document cache together.
///
/// The manager is `Send + Sync` and designed for concurrent request threads;
/// the cache is its only shared mutable state. It lives for the process
/// lifetime and is handed to the page-save collaborator as a
/// [`PageEventListener`].
pub struct RenderingManager {
    parser_name: String,
    renderer_name: String,
    wysiwyg_renderer_name: String,
    parsers: ParserRegistry,
    renderers: RendererRegistry,
    cache: Option<DocumentCache>,
    references: Arc<dyn ReferenceIndex>,
}

impl std::fmt::Debug for RenderingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingManager")
            .field("parser_name", &self.parser_name)
            .field("renderer_name", &self.renderer_name)
            .field("wysiwyg_renderer_name", &self.wysiwyg_renderer_name)
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl RenderingManager {
    /// Initialize with the built-in parser and renderer registries.
    pub fn initialize(
        rendering: &RenderingSettings,
        cache: &CacheSettings,
        references: Arc<dyn ReferenceIndex>,
    ) -> Result<Self, ConfigurationError> {
        Self::initialize_with(
            rendering,
            cache,
            references,
            ParserRegistry::builtin(),
            RendererRegistry::builtin(),
        )
    }

    /// Initialize with explicit registries, for embedders that ship their own
    /// parser or renderer implementations.
    pub fn initialize_with(
        rendering: &RenderingSettings,
        cache: &CacheSettings,
        references: Arc<dyn ReferenceIndex>,
        parsers: ParserRegistry,
        renderers: RendererRegistry,
    ) -> Result<Self, ConfigurationError> {
        let parser_name = if parsers.contains(&rendering.parser) {
            rendering.parser.clone()
        } else {
            warn!(
                configured = %rendering.parser,
                fallback = DEFAULT_PARSER,
                "Configured markup parser is not registered, reverting to default"
            );
            DEFAULT_PARSER.to_string()
        };
        info!(parser = %parser_name, "Using markup parser");

        for name in [&rendering.renderer, &rendering.wysiwyg_renderer] {
            if !renderers.contains(name) {
                return Err(ConfigurationError::UnknownRenderer { name: name.clone() });
            }
        }
        info!(renderer = %rendering.renderer, "Rendering content");

        Ok(Self {
            parser_name,
            renderer_name: rendering.renderer.clone(),
            wysiwyg_renderer_name: rendering.wysiwyg_renderer.clone(),
            parsers,
            renderers,
            cache: build_cache(cache),
            references,
        })
    }

    /// Instantiate the configured parser for the given context and raw text.
    ///
    /// Falls back to the built-in parser when the configured factory fails;
    /// callers always get a working parser.
    pub fn parser(&self, context: &RenderingContext, page_data: &str) -> Box<dyn MarkupParser> {
        if let Some(factory) = self.parsers.resolve(&self.parser_name) {
            match factory(context, page_data) {
                Ok(parser) => return parser,
                Err(err) => {
                    error!(
                        parser = %self.parser_name,
                        error = %err,
                        "Unable to instantiate configured markup parser, using built-in default"
                    );
                }
            }
        }
        Box::new(WikiMarkupParser::new(context, page_data))
    }

    /// Return the parsed document for the context's page, from cache when the
    /// request allows it and the memoized source text still matches.
    ///
    /// Parse failures are logged and surfaced as `None`.
    pub fn rendered_document(
        &self,
        context: &RenderingContext,
        page_data: &str,
    ) -> Option<Arc<ParsedDocument>> {
        let key = context.document_key();
        let cacheable = self.use_cache(context);

        if cacheable {
            if let Some(cache) = &self.cache {
                if let Some(document) = cache.get(&key) {
                    // Upstream filters may have rewritten the page data since
                    // this entry was stored; the key alone is not sufficient.
                    if document.page_data() == page_data {
                        debug!(key = %key, "Using cached document");
                        return Some(document);
                    }
                }
            }
        }

        counter!(METRIC_PARSE).increment(1);
        let parser = self.parser(context, page_data);
        match parser.parse() {
            Ok(parsed) => {
                let document = Arc::new(parsed.stamped(page_data));
                if cacheable {
                    if let Some(cache) = &self.cache {
                        debug!(key = %key, "Re-rendering and storing document");
                        cache.put(key, Arc::clone(&document));
                    }
                }
                Some(document)
            }
            Err(err) => {
                error!(page = %context.page(), error = %err, "Unable to parse page markup");
                None
            }
        }
    }

    /// Produce the final string for a document, selecting the WYSIWYG or
    /// standard renderer from the context.
    pub fn html(
        &self,
        context: &RenderingContext,
        document: &Arc<ParsedDocument>,
    ) -> Result<String, RenderError> {
        let renderer = if context.wysiwyg_editing() {
            self.wysiwyg_renderer(context, document)
        } else {
            self.renderer(context, document)
        };
        let Some(renderer) = renderer else {
            return Err(RenderError::execution("renderer unavailable"));
        };

        let started_at = Instant::now();
        let output = renderer.render()?;
        histogram!(METRIC_RENDER_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        Ok(output)
    }

    /// Instantiate the configured standard renderer bound to (context,
    /// document); `None` when instantiation fails.
    pub fn renderer(
        &self,
        context: &RenderingContext,
        document: &Arc<ParsedDocument>,
    ) -> Option<Box<dyn Renderer>> {
        self.instantiate(&self.renderer_name, context, document)
    }

    /// Instantiate the configured WYSIWYG renderer bound to (context,
    /// document); `None` when instantiation fails.
    pub fn wysiwyg_renderer(
        &self,
        context: &RenderingContext,
        document: &Arc<ParsedDocument>,
    ) -> Option<Box<dyn Renderer>> {
        self.instantiate(&self.wysiwyg_renderer_name, context, document)
    }

    fn instantiate(
        &self,
        name: &str,
        context: &RenderingContext,
        document: &Arc<ParsedDocument>,
    ) -> Option<Box<dyn Renderer>> {
        let factory = self.renderers.resolve(name)?;
        match factory(context, Arc::clone(document)) {
            Ok(renderer) => Some(renderer),
            Err(err) => {
                error!(renderer = %name, error = %err, "Unable to instantiate renderer");
                None
            }
        }
    }

    /// Whether this request may read from and write to the document cache.
    /// Only plain page views are eligible.
    fn use_cache(&self, context: &RenderingContext) -> bool {
        self.cache.is_some() && context.purpose() == RequestPurpose::View
    }
}

impl PageEventListener for RenderingManager {
    /// Flush memoized documents in response to a committed page save.
    ///
    /// Removes the bare page-name key for the saved page, then the three
    /// latest-version keys (one per plugin-flag state) of every page that
    /// refers to it: a save can change how referrers render, e.g. a link that
    /// was broken now resolves. The saved page's own versioned keys are left
    /// alone; the content-identity check covers them. Kept as-is from the
    /// historical behavior this pipeline reproduces.
    fn page_event(&self, event: &PageEvent) {
        debug!(event_id = %event.id(), kind = ?event.kind(), "Page event received");
        let Some(cache) = &self.cache else {
            return;
        };

        let PageEventKind::ContentCommitted { page } = event.kind();
        cache.remove(&DocumentKey::bare(page));

        let referrers = match self.references.find_referrers(page) {
            Ok(referrers) => referrers,
            Err(err) => {
                debug!(page = %page, error = %err, "Referrer lookup failed, flushing nothing further");
                Vec::new()
            }
        };
        for referrer in &referrers {
            debug!(page = %referrer, "Flushing latest version of referring page");
            for flag in PluginFlag::ALL {
                cache.remove(&DocumentKey::latest(referrer, flag));
            }
        }
    }
}

fn build_cache(settings: &CacheSettings) -> Option<DocumentCache> {
    if !settings.enabled {
        info!("Document cache disabled by configuration");
        return None;
    }
    let Some(capacity) = NonZeroUsize::new(settings.capacity) else {
        warn!("Document cache capacity is zero, running without cache");
        return None;
    };
    if settings.expiry.is_zero() {
        warn!("Document cache expiry is zero, running without cache");
        return None;
    }
    info!(
        capacity = capacity.get(),
        expiry_secs = settings.expiry.as_secs(),
        "Document cache enabled"
    );
    Some(DocumentCache::new(capacity, settings.expiry))
}
