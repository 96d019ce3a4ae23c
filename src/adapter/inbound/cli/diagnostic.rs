//! Miette-based error diagnostics for CLI error presentation.
//!
//! The struct fields are read by miette's derive macros when the report is
//! rendered with the offending configuration snippet.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Configuration file error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(bookstore::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// The configuration file text.
    #[source_code]
    pub src: NamedSource<String>,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: Option<SourceSpan>,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build a diagnostic for a TOML error in the file at `path`.
    #[must_use]
    pub fn from_toml(path: &Path, content: &str, error: &toml::de::Error) -> Self {
        Self {
            message: format!("invalid configuration: {}", error.message()),
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: error
                .span()
                .map(|range| SourceSpan::from((range.start, range.len()))),
            help: Some("see the [database] and [logging] sections of the README".to_string()),
        }
    }
}
