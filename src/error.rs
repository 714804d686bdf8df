//! Error types for the localizer library
//!
//! Fatal conditions surface as [`LocalizerError`]. Conditions that only narrow
//! the analysis (an unreadable header, a missing demangler) are reported as
//! [`crate::diagnostics::Warning`] values instead.

use std::path::PathBuf;

/// Errors that abort an analysis or recording run.
#[derive(Debug, thiserror::Error)]
pub enum LocalizerError {
    #[error("failed to read report '{}': {source}", path.display())]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report '{}': {source}", path.display())]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to list report directory '{}': {source}", path.display())]
    ReportDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("demangler failed: {0}")]
    Demangler(String),

    #[error("failed to read object '{}': {source}", path.display())]
    ObjectRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse object '{}': {source}", path.display())]
    ObjectParse {
        path: PathBuf,
        #[source]
        source: goblin::error::Error,
    },

    #[error("unsupported object '{}': {reason}", path.display())]
    UnsupportedObject { path: PathBuf, reason: String },

    #[error("failed to write report '{}': {source}", path.display())]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, LocalizerError>;
