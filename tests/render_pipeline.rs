//! End-to-end tests for the rendering pipeline: memoization, staleness,
//! commit-driven invalidation and configuration fallback, driven through the
//! public facade only.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use folia::config::{CacheSettings, RenderingSettings};
use folia::domain::{PageName, PageVersion, PluginFlag, RequestPurpose};
use folia::events::{PageEvent, PageEventListener};
use folia::markup::{
    MarkupParser, ParseError, ParsedDocument, ParserInstantiationError, ParserRegistry,
    WikiMarkupParser,
};
use folia::refs::{InMemoryReferenceIndex, ReferenceIndex};
use folia::render::{
    ConfigurationError, RendererInstantiationError, RendererRegistry, RenderingContext,
    RenderingManager,
};

fn page(name: &str) -> PageName {
    PageName::new(name).expect("valid page name")
}

struct CountingParser {
    inner: WikiMarkupParser,
    parses: Arc<AtomicUsize>,
}

impl MarkupParser for CountingParser {
    fn parse(&self) -> Result<ParsedDocument, ParseError> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        self.inner.parse()
    }
}

/// Manager whose default parser counts parse invocations.
fn counting_manager(
    references: Arc<dyn ReferenceIndex>,
    cache: CacheSettings,
) -> (RenderingManager, Arc<AtomicUsize>) {
    let parses = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&parses);

    let mut parsers = ParserRegistry::builtin();
    parsers.register("wiki", move |context, raw| {
        Ok(Box::new(CountingParser {
            inner: WikiMarkupParser::new(context, raw),
            parses: Arc::clone(&counter),
        }))
    });

    let manager = RenderingManager::initialize_with(
        &RenderingSettings::default(),
        &cache,
        references,
        parsers,
        RendererRegistry::builtin(),
    )
    .expect("built-in components resolve");
    (manager, parses)
}

#[test]
fn end_to_end_memoization_and_commit_quirk() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    let (manager, parses) =
        counting_manager(references as Arc<dyn ReferenceIndex>, CacheSettings::default());

    let context = RenderingContext::new(page("Home"))
        .with_version(PageVersion::Numbered(3))
        .with_plugin_flag(PluginFlag::Disabled);
    assert_eq!(context.document_key().as_str(), "Home::3::false");

    let first = manager
        .rendered_document(&context, "Hello")
        .expect("parse succeeds");
    assert_eq!(parses.load(Ordering::SeqCst), 1);

    let second = manager
        .rendered_document(&context, "Hello")
        .expect("cached document");
    assert_eq!(parses.load(Ordering::SeqCst), 1);
    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.page_data(), second.page_data());

    // Commit invalidation removes the page-name-only key for the saved page,
    // not its versioned keys; the memoized entry deliberately survives its
    // own page's commit.
    manager.page_event(&PageEvent::content_committed(page("Home")));
    manager
        .rendered_document(&context, "Hello")
        .expect("still cached");
    assert_eq!(parses.load(Ordering::SeqCst), 1);
}

#[test]
fn stale_source_text_forces_a_fresh_parse() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    let (manager, parses) =
        counting_manager(references as Arc<dyn ReferenceIndex>, CacheSettings::default());

    let context = RenderingContext::new(page("Home")).with_version(PageVersion::Numbered(1));

    manager
        .rendered_document(&context, "Hello")
        .expect("parse succeeds");
    assert_eq!(parses.load(Ordering::SeqCst), 1);

    // Same key, different bytes: the cached entry must not be reused.
    let updated = manager
        .rendered_document(&context, "Hello again")
        .expect("parse succeeds");
    assert_eq!(parses.load(Ordering::SeqCst), 2);
    assert_eq!(updated.page_data(), "Hello again");

    // The replacement is memoized in turn.
    manager
        .rendered_document(&context, "Hello again")
        .expect("cached document");
    assert_eq!(parses.load(Ordering::SeqCst), 2);
}

#[test]
fn non_view_purposes_bypass_the_cache_entirely() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    let (manager, parses) =
        counting_manager(references as Arc<dyn ReferenceIndex>, CacheSettings::default());

    let edit = RenderingContext::new(page("Home")).with_purpose(RequestPurpose::Edit);
    manager.rendered_document(&edit, "Hello").expect("parses");
    manager.rendered_document(&edit, "Hello").expect("parses");
    assert_eq!(parses.load(Ordering::SeqCst), 2);

    // The edit renders wrote nothing: the first view still parses.
    let view = RenderingContext::new(page("Home"));
    manager.rendered_document(&view, "Hello").expect("parses");
    assert_eq!(parses.load(Ordering::SeqCst), 3);

    // And a preview ignores what the view memoized.
    let preview = RenderingContext::new(page("Home")).with_purpose(RequestPurpose::Preview);
    manager.rendered_document(&preview, "Hello").expect("parses");
    assert_eq!(parses.load(Ordering::SeqCst), 4);

    manager.rendered_document(&view, "Hello").expect("cached");
    assert_eq!(parses.load(Ordering::SeqCst), 4);
}

#[test]
fn committing_a_page_flushes_all_flag_variants_of_its_referrers() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    references.record(page("Home"), page("PageB"));
    references.record(page("Home"), page("PageC"));
    let (manager, parses) = counting_manager(
        Arc::clone(&references) as Arc<dyn ReferenceIndex>,
        CacheSettings::default(),
    );

    // Memoize the latest version of both referrers under every flag state.
    for name in ["PageB", "PageC"] {
        for flag in PluginFlag::ALL {
            let context = RenderingContext::new(page(name)).with_plugin_flag(flag);
            manager
                .rendered_document(&context, "links to [Home]")
                .expect("parse succeeds");
        }
    }
    assert_eq!(parses.load(Ordering::SeqCst), 6);

    // All six entries are warm.
    for name in ["PageB", "PageC"] {
        for flag in PluginFlag::ALL {
            let context = RenderingContext::new(page(name)).with_plugin_flag(flag);
            manager
                .rendered_document(&context, "links to [Home]")
                .expect("cached document");
        }
    }
    assert_eq!(parses.load(Ordering::SeqCst), 6);

    manager.page_event(&PageEvent::content_committed(page("Home")));

    // Every latest-version variant of both referrers was flushed.
    for name in ["PageB", "PageC"] {
        for flag in PluginFlag::ALL {
            let context = RenderingContext::new(page(name)).with_plugin_flag(flag);
            manager
                .rendered_document(&context, "links to [Home]")
                .expect("parse succeeds");
        }
    }
    assert_eq!(parses.load(Ordering::SeqCst), 12);
}

#[test]
fn disabled_cache_always_misses() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    let cache = CacheSettings {
        enabled: false,
        ..Default::default()
    };
    let (manager, parses) = counting_manager(references as Arc<dyn ReferenceIndex>, cache);

    let context = RenderingContext::new(page("Home"));
    manager.rendered_document(&context, "Hello").expect("parses");
    manager.rendered_document(&context, "Hello").expect("parses");
    assert_eq!(parses.load(Ordering::SeqCst), 2);

    // Commit events are a no-op without a cache.
    manager.page_event(&PageEvent::content_committed(page("Home")));
}

#[test]
fn unknown_parser_name_silently_uses_the_builtin() {
    let rendering = RenderingSettings {
        parser: "no-such-parser".to_string(),
        ..Default::default()
    };
    let manager = RenderingManager::initialize(
        &rendering,
        &CacheSettings::default(),
        Arc::new(InMemoryReferenceIndex::new()),
    )
    .expect("parser fallback must not fail initialization");

    let context = RenderingContext::new(page("Home"));
    let document = manager
        .rendered_document(&context, "__Hello__")
        .expect("built-in parser handles the request");
    let html = manager.html(&context, &document).expect("render succeeds");
    assert_eq!(html, "<p><strong>Hello</strong></p>\n");
}

#[test]
fn unknown_renderer_name_fails_initialization() {
    let rendering = RenderingSettings {
        renderer: "no-such-renderer".to_string(),
        ..Default::default()
    };
    let err = RenderingManager::initialize(
        &rendering,
        &CacheSettings::default(),
        Arc::new(InMemoryReferenceIndex::new()),
    )
    .expect_err("unknown renderer is fatal");
    assert!(matches!(err, ConfigurationError::UnknownRenderer { .. }));
}

#[test]
fn parser_factory_failure_falls_back_to_the_builtin() {
    let mut parsers = ParserRegistry::builtin();
    parsers.register("wiki", |_, _| {
        Err(ParserInstantiationError::new("wiki", "refuses to build"))
    });
    let manager = RenderingManager::initialize_with(
        &RenderingSettings::default(),
        &CacheSettings::default(),
        Arc::new(InMemoryReferenceIndex::new()),
        parsers,
        RendererRegistry::builtin(),
    )
    .expect("initialization succeeds");

    let context = RenderingContext::new(page("Home"));
    let document = manager
        .rendered_document(&context, "Hello")
        .expect("fallback parser handles the request");
    assert_eq!(document.page_data(), "Hello");
}

#[test]
fn parse_failure_surfaces_as_absent() {
    struct FailingParser;
    impl MarkupParser for FailingParser {
        fn parse(&self) -> Result<ParsedDocument, ParseError> {
            Err(ParseError::Read {
                message: "storage went away".to_string(),
            })
        }
    }

    let mut parsers = ParserRegistry::builtin();
    parsers.register("wiki", |_, _| Ok(Box::new(FailingParser)));
    let manager = RenderingManager::initialize_with(
        &RenderingSettings::default(),
        &CacheSettings::default(),
        Arc::new(InMemoryReferenceIndex::new()),
        parsers,
        RendererRegistry::builtin(),
    )
    .expect("initialization succeeds");

    let context = RenderingContext::new(page("Home"));
    assert!(manager.rendered_document(&context, "Hello").is_none());
}

#[test]
fn renderer_factory_failure_surfaces_as_absent_and_html_errors() {
    let mut renderers = RendererRegistry::builtin();
    renderers.register("xhtml", |_, _| {
        Err(RendererInstantiationError::new("xhtml", "refuses to build"))
    });
    let manager = RenderingManager::initialize_with(
        &RenderingSettings::default(),
        &CacheSettings::default(),
        Arc::new(InMemoryReferenceIndex::new()),
        ParserRegistry::builtin(),
        renderers,
    )
    .expect("initialization succeeds");

    let context = RenderingContext::new(page("Home"));
    let document = manager
        .rendered_document(&context, "Hello")
        .expect("parse succeeds");

    assert!(manager.renderer(&context, &document).is_none());
    assert!(manager.html(&context, &document).is_err());

    // The WYSIWYG renderer is unaffected.
    let editing = context.with_wysiwyg_editing(true);
    assert!(manager.html(&editing, &document).is_ok());
}

#[test]
fn concurrent_renders_and_invalidation_do_not_interfere() {
    let references = Arc::new(InMemoryReferenceIndex::new());
    for name in ["P0", "P1", "P2", "P3"] {
        references.record(page("Home"), page(name));
    }
    let (manager, _) = counting_manager(
        Arc::clone(&references) as Arc<dyn ReferenceIndex>,
        CacheSettings::default(),
    );
    let manager = Arc::new(manager);

    std::thread::scope(|scope| {
        for name in ["P0", "P1", "P2", "P3"] {
            let manager = Arc::clone(&manager);
            scope.spawn(move || {
                let context = RenderingContext::new(page(name));
                for round in 0..50 {
                    let text = format!("round {} of [Home]", round % 3);
                    let document = manager
                        .rendered_document(&context, &text)
                        .expect("parse succeeds");
                    assert_eq!(document.page_data(), text);
                }
            });
        }
        let invalidator = Arc::clone(&manager);
        scope.spawn(move || {
            for _ in 0..50 {
                invalidator.page_event(&PageEvent::content_committed(page("Home")));
            }
        });
    });
}
