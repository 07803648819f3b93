//! Settings for gojava
//!
//! A flat key/value surface, read from a JSON object such as a host's `settings.json` fragment:
//!
//! ```json
//! {
//!   "gojava.parser": "scan",
//!   "gojava.emitLearningNotes": false,
//!   "gojava.resolver.enabled": true,
//!   "gojava.resolver.maxDepth": 2
//! }
//! ```
//!
//! Missing keys take their defaults. Keys outside the `gojava.` namespace are ignored; unknown `gojava.` keys are
//! ignored with a warning. Ill-typed values are a [`SettingsError`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;

use crate::backend::GeneratorOptions;
use crate::frontend::ParserStrategy;
use crate::resolve::{DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT, DEFAULT_TTL, ResolverOptions};

const NAMESPACE: &str = "gojava.";

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SettingsError {
    #[error("cannot read settings file `{}`", path.display())]
    #[diagnostic(code(gojava::settings))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {message}")]
    #[diagnostic(code(gojava::settings), help("settings are a flat JSON object of `gojava.*` keys"))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(gojava::settings))]
    Invalid { key: &'static str, message: String },
}

/// Translator settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "gojava.parser")]
    pub parser: ParserStrategy,
    #[serde(rename = "gojava.emitConstructors")]
    pub emit_constructors: bool,
    #[serde(rename = "gojava.emitGettersSetters")]
    pub emit_getters_setters: bool,
    #[serde(rename = "gojava.emitDocComments")]
    pub emit_doc_comments: bool,
    #[serde(rename = "gojava.emitExternalTypes")]
    pub emit_external_types: bool,
    #[serde(rename = "gojava.emitLearningNotes")]
    pub emit_learning_notes: bool,
    #[serde(rename = "gojava.errorsAsExceptions")]
    pub errors_as_exceptions: bool,
    #[serde(rename = "gojava.boxScalars")]
    pub box_scalars: bool,
    #[serde(rename = "gojava.resolver.enabled")]
    pub resolver_enabled: bool,
    #[serde(rename = "gojava.resolver.maxDepth")]
    pub max_depth: usize,
    #[serde(rename = "gojava.resolver.resolveStdlib")]
    pub resolve_stdlib: bool,
    #[serde(rename = "gojava.oracle.timeoutMs")]
    pub timeout_ms: u64,
    #[serde(rename = "gojava.cache.ttlSecs")]
    pub cache_ttl_secs: u64,
    /// Everything else in the object.
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let generator = GeneratorOptions::default();
        Self {
            parser: ParserStrategy::default(),
            emit_constructors: generator.emit_constructors,
            emit_getters_setters: generator.emit_getters_setters,
            emit_doc_comments: generator.emit_doc_comments,
            emit_external_types: generator.emit_external_types,
            emit_learning_notes: generator.emit_learning_notes,
            errors_as_exceptions: generator.errors_as_exceptions,
            box_scalars: generator.box_scalars,
            resolver_enabled: false,
            max_depth: DEFAULT_MAX_DEPTH,
            resolve_stdlib: false,
            timeout_ms: duration_millis(DEFAULT_TIMEOUT),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            other: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON text.
    ///
    /// ## Errors
    /// - [`SettingsError::Parse`] for malformed JSON or ill-typed values, labelled at the offending position.
    /// - [`SettingsError::Invalid`] for values outside their range.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        Self::parse_named("settings.json", text)
    }

    /// Read and parse a settings file.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_named(&path.display().to_string(), &text)
    }

    fn parse_named(name: &str, text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text).map_err(|e| SettingsError::Parse {
            message: e.to_string(),
            span: SourceSpan::from((error_offset(text, e.line(), e.column()), 1)),
            src: NamedSource::new(name, text.to_string()),
        })?;
        for key in settings.other.keys().filter(|k| k.starts_with(NAMESPACE)) {
            tracing::warn!(%key, "settings: unknown key ignored");
        }
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "gojava.oracle.timeoutMs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "gojava.cache.ttlSecs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Unrecognized `gojava.` keys, in sorted order.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.other
            .keys()
            .filter(|k| k.starts_with(NAMESPACE))
            .map(String::as_str)
            .collect()
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            emit_constructors: self.emit_constructors,
            emit_getters_setters: self.emit_getters_setters,
            emit_doc_comments: self.emit_doc_comments,
            emit_external_types: self.emit_external_types,
            emit_learning_notes: self.emit_learning_notes,
            errors_as_exceptions: self.errors_as_exceptions,
            box_scalars: self.box_scalars,
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::default()
            .with_max_depth(self.max_depth)
            .with_resolve_stdlib(self.resolve_stdlib)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_strategy(self.parser)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn with_parser(mut self, parser: ParserStrategy) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_resolver(mut self, enabled: bool) -> Self {
        self.resolver_enabled = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_learning_notes(mut self, on: bool) -> Self {
        self.emit_learning_notes = on;
        self
    }

    pub fn with_doc_comments(mut self, on: bool) -> Self {
        self.emit_doc_comments = on;
        self
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Byte offset of a 1-based (line, column) position reported by `serde_json`.
fn error_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text.split_inclusive('\n').take(line.saturating_sub(1)).map(str::len).sum();
    (line_start + column.saturating_sub(1)).min(text.len().saturating_sub(1))
}
