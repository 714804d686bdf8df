//! Wire format of a single link report

use crate::error::{LocalizerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One `{file, name}` pair of a report
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolRef {
    /// Path of the input file the symbol belongs to
    pub file: String,
    /// Exact linker symbol name
    pub name: String,
}

impl SymbolRef {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// Symbols observed during one linker invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Global symbols defined by an input file
    #[serde(default)]
    pub exports: Vec<SymbolRef>,
    /// Symbols referenced by an input file
    #[serde(default)]
    pub imports: Vec<SymbolRef>,
    /// Symbols exported from the shared library being linked
    #[serde(default)]
    pub global_exports: Vec<SymbolRef>,
}

impl LinkReport {
    /// Parse a report from JSON text
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Read and parse a report file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LocalizerError::ReportRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents).map_err(|source| LocalizerError::ReportParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| LocalizerError::RecordWrite {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        fs::write(path, json + "\n").map_err(|source| LocalizerError::RecordWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of records across all three lists
    pub fn record_count(&self) -> usize {
        self.exports.len() + self.imports.len() + self.global_exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
