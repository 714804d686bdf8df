//! Non-fatal diagnostics collected during a run
//!
//! Every stage that can degrade without invalidating the use-count check
//! returns warnings instead of failing. They travel with the final report so
//! the CLI can show them next to the candidate list.

use serde::Serialize;
use std::fmt;

/// A non-fatal condition observed while building or classifying the symbol table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A symbol has definitions in more than one file
    DuplicateDefinition { symbol: String, origins: Vec<String> },
    /// A report could not be read or parsed and was left out (best-effort mode)
    SkippedReport { path: String, reason: String },
    /// Demangling failed; header matching fell back to raw names
    DemanglerFailed { reason: String },
    /// A header file or root could not be read
    UnreadableHeader { path: String, reason: String },
}

impl Warning {
    /// Short machine-friendly label for the warning kind
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::DuplicateDefinition { .. } => "duplicate_definition",
            Warning::SkippedReport { .. } => "skipped_report",
            Warning::DemanglerFailed { .. } => "demangler_failed",
            Warning::UnreadableHeader { .. } => "unreadable_header",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateDefinition { symbol, origins } => write!(
                f,
                "symbol {} is defined in multiple files:\n  {}",
                symbol,
                origins.join("\n  ")
            ),
            Warning::SkippedReport { path, reason } => {
                write!(f, "skipping report {}: {}", path, reason)
            }
            Warning::DemanglerFailed { reason } => write!(
                f,
                "failed to demangle symbol names, matching headers against raw names: {}",
                reason
            ),
            Warning::UnreadableHeader { path, reason } => {
                write!(f, "failed to index header {}: {}", path, reason)
            }
        }
    }
}
