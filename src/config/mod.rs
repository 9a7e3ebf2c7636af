//! Configuration layer: typed settings with layered precedence (file → environment).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::markup::DEFAULT_PARSER;
use crate::render::{DEFAULT_RENDERER, DEFAULT_WYSIWYG_RENDERER};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folia";
const ENV_PREFIX: &str = "FOLIA";
const ENV_SEPARATOR: &str = "__";

pub(crate) const DEFAULT_CACHE_CAPACITY: usize = 1_000;
pub(crate) const DEFAULT_CACHE_EXPIRY_SECS: u64 = 24 * 60 * 60;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub rendering: RenderingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Which parser and renderer implementations the manager selects by name.
#[derive(Debug, Clone)]
pub struct RenderingSettings {
    pub parser: String,
    pub renderer: String,
    pub wysiwyg_renderer: String,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            parser: DEFAULT_PARSER.to_string(),
            renderer: DEFAULT_RENDERER.to_string(),
            wysiwyg_renderer: DEFAULT_WYSIWYG_RENDERER.to_string(),
        }
    }
}

/// Document cache sizing and lifetime.
///
/// A zero capacity or expiry is accepted here and degrades the cache to
/// pass-through at manager initialization; cache misconfiguration is never
/// fatal.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub capacity: usize,
    pub expiry: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_CACHE_CAPACITY,
            expiry: Duration::from_secs(DEFAULT_CACHE_EXPIRY_SECS),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment).
pub fn load() -> Result<Settings, LoadError> {
    let builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

/// Load settings from an explicit file, then environment overrides.
pub fn load_from(path: &Path) -> Result<Settings, LoadError> {
    let builder = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    rendering: RawRenderingSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderingSettings {
    parser: Option<String>,
    renderer: Option<String>,
    wysiwyg_renderer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    capacity: Option<usize>,
    expiry_seconds: Option<u64>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            rendering,
            cache,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            rendering: build_rendering_settings(rendering)?,
            cache: build_cache_settings(cache),
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_rendering_settings(
    rendering: RawRenderingSettings,
) -> Result<RenderingSettings, LoadError> {
    let parser = non_empty(rendering.parser, DEFAULT_PARSER, "rendering.parser")?;
    let renderer = non_empty(rendering.renderer, DEFAULT_RENDERER, "rendering.renderer")?;
    let wysiwyg_renderer = non_empty(
        rendering.wysiwyg_renderer,
        DEFAULT_WYSIWYG_RENDERER,
        "rendering.wysiwyg_renderer",
    )?;

    Ok(RenderingSettings {
        parser,
        renderer,
        wysiwyg_renderer,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> CacheSettings {
    CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        capacity: cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
        expiry: Duration::from_secs(cache.expiry_seconds.unwrap_or(DEFAULT_CACHE_EXPIRY_SECS)),
    }
}

fn non_empty(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(key, "must not be empty"));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(default.to_string()),
    }
}
