//! Header symbol index
//!
//! Collects names that look declared in public headers. Such symbols are
//! assumed to be meant for outside use and are never reported, whatever the
//! link-time evidence says. Matching is lexical and deliberately loose: an
//! extra name only widens the exemption set.

use crate::diagnostics::Warning;
use crate::error::Result;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Configuration for header discovery
#[derive(Debug, Clone)]
pub struct HeaderIndexConfig {
    /// File extensions treated as headers (without the dot)
    pub extensions: Vec<String>,
    /// Log progress every this many headers (0 disables)
    pub progress_interval: usize,
}

impl Default for HeaderIndexConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["h".to_string(), "hpp".to_string(), "hh".to_string()],
            progress_interval: 100,
        }
    }
}

/// Flat set of names found in headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSymbolSet {
    names: HashSet<String>,
}

impl HeaderSymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderSymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for HeaderSymbolSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// Result of indexing a set of header roots
#[derive(Debug, Default)]
pub struct HeaderIndexOutcome {
    pub symbols: HeaderSymbolSet,
    pub headers_scanned: usize,
    pub warnings: Vec<Warning>,
}

/// Scans header trees for declared names
pub struct HeaderIndex {
    config: HeaderIndexConfig,
    // identifier followed by `(`, `[` or `;`
    declaration_regex: Regex,
    // body of a `#define` line
    define_regex: Regex,
    identifier_regex: Regex,
}

impl HeaderIndex {
    /// Create a new header index with configuration
    pub fn new(config: HeaderIndexConfig) -> Result<Self> {
        Ok(Self {
            config,
            declaration_regex: Regex::new(r"(?i)\b([a-z_][a-z_0-9]*)\s*[\[(;]")?,
            define_regex: Regex::new(r"(?m)^[ \t]*#[ \t]*define[ \t]+(.*)$")?,
            identifier_regex: Regex::new(r"(?i)\b[a-z_][a-z_0-9]*\b")?,
        })
    }

    /// Create a header index with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(HeaderIndexConfig::default())
    }

    fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.config.extensions.iter().any(|allowed| allowed == ext))
            .unwrap_or(false)
    }

    /// Recursively list header files under `roots`, sorted per root
    pub fn find_headers(&self, roots: &[PathBuf]) -> (Vec<PathBuf>, Vec<Warning>) {
        let mut headers = Vec::new();
        let mut warnings = Vec::new();

        for root in roots {
            for entry in WalkDir::new(root).sort_by_file_name() {
                match entry {
                    Ok(entry) => {
                        if entry.file_type().is_file() && self.is_header(entry.path()) {
                            headers.push(entry.into_path());
                        }
                    }
                    Err(err) => {
                        let path = err
                            .path()
                            .unwrap_or(root.as_path())
                            .display()
                            .to_string();
                        warnings.push(Warning::UnreadableHeader {
                            path,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        (headers, warnings)
    }

    /// Extract declared-looking names from header text
    pub fn extract_symbols(&self, contents: &str) -> HashSet<String> {
        let mut names = HashSet::new();

        for captures in self.declaration_regex.captures_iter(contents) {
            if let Some(name) = captures.get(1) {
                names.insert(name.as_str().to_string());
            }
        }

        for captures in self.define_regex.captures_iter(contents) {
            if let Some(body) = captures.get(1) {
                for name in self.identifier_regex.find_iter(body.as_str()) {
                    names.insert(name.as_str().to_string());
                }
            }
        }

        names
    }

    /// Index every header under `roots`
    pub fn index(&self, roots: &[PathBuf]) -> HeaderIndexOutcome {
        let (headers, mut warnings) = self.find_headers(roots);
        let total = headers.len();
        let done = AtomicUsize::new(0);

        let per_file: Vec<std::result::Result<HashSet<String>, Warning>> = headers
            .par_iter()
            .map(|header| {
                let result = fs::read(header)
                    .map(|bytes| self.extract_symbols(&String::from_utf8_lossy(&bytes)))
                    .map_err(|err| Warning::UnreadableHeader {
                        path: header.display().to_string(),
                        reason: err.to_string(),
                    });

                let count = done.fetch_add(1, Ordering::Relaxed) + 1;
                let interval = self.config.progress_interval;
                if interval > 0 && count % interval == 0 {
                    info!("indexed {}/{} headers...", count, total);
                }
                result
            })
            .collect();

        let mut symbols = HeaderSymbolSet::new();
        for result in per_file {
            match result {
                Ok(names) => symbols.extend(names),
                Err(warning) => warnings.push(warning),
            }
        }

        debug!(
            headers = total,
            symbols = symbols.len(),
            "indexed header symbols"
        );

        HeaderIndexOutcome {
            symbols,
            headers_scanned: total,
            warnings,
        }
    }
}
