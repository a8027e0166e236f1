//! # Harness errors
//!
//! Errors that stop the harness itself: configuration that cannot be read, a
//! bad filter pattern, a registry built with a duplicate key. They are never
//! produced by the code under test; raised values inside tests are
//! [`Fault`](crate::fault::Fault)s and always end up as reported outcomes.
//!
//! Every variant is a `miette` diagnostic with a stable code and, where one
//! exists, a hint for fixing it. The CLI prints them as `miette::Report`s.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub type Result<T, E = AssayError> = std::result::Result<T, E>;

/// Type-safe classification of [`AssayError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Filter,
    Registry,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "Config",
            ErrorKind::Filter => "Filter",
            ErrorKind::Registry => "Registry",
            ErrorKind::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum AssayError {
    #[error("could not read configuration file {}", .path.display())]
    #[diagnostic(
        code(assay::config::read),
        help("pass an existing file with --config, or remove the option")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(assay::config::parse))]
    ConfigParse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("invalid filter pattern `{pattern}`")]
    #[diagnostic(
        code(assay::filter),
        help("filters are case-insensitive regular expressions; escape special characters")
    )]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("assertion `{name}` is already registered")]
    #[diagnostic(
        code(assay::registry::duplicate),
        help("every assertion key must be unique; pick another name")
    )]
    DuplicateAssertion { name: String },

    #[error("{context}")]
    #[diagnostic(code(assay::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl AssayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssayError::ConfigRead { .. } | AssayError::ConfigParse { .. } => ErrorKind::Config,
            AssayError::InvalidFilter { .. } => ErrorKind::Filter,
            AssayError::DuplicateAssertion { .. } => ErrorKind::Registry,
            AssayError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Builds a parse error pointing into the YAML text that failed.
    pub fn config_parse(name: &str, text: &str, err: &serde_yaml::Error) -> Self {
        let span = err
            .location()
            .map(|loc| SourceSpan::from((loc.index().min(text.len()), 1)));
        AssayError::ConfigParse {
            message: err.to_string(),
            src: NamedSource::new(name, text.to_string()),
            span,
        }
    }
}
