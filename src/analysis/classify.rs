//! Symbol classification
//!
//! Two passes over a fully populated table: a duplicate-definition check that
//! only produces warnings, then candidate selection. Neither pass can fail.

use crate::diagnostics::Warning;
use crate::headers::HeaderSymbolSet;
use crate::symtab::{Symbol, SymbolTable};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// How symbols exported from a shared library are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedLibraryPolicy {
    /// Library exports count as uses and are never reported
    #[default]
    Conservative,
    /// Library exports with no other use are listed separately for review
    Separate,
}

/// Fixed exemption lists used by the classifier
#[derive(Debug, Clone)]
pub struct ClassifierPolicy {
    /// Path prefixes of system libraries; symbols defined there are out of scope
    pub system_roots: Vec<String>,
    /// Name prefixes of compiler-generated symbols, skipped by the duplicate check
    pub reserved_prefixes: Vec<String>,
    /// Names allowed to be defined in several files (one per linked program)
    pub duplicate_allowlist: Vec<String>,
    pub shared_library_policy: SharedLibraryPolicy,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            system_roots: vec!["/usr/".to_string(), "/lib/".to_string()],
            reserved_prefixes: vec!["_".to_string()],
            duplicate_allowlist: vec!["main".to_string()],
            shared_library_policy: SharedLibraryPolicy::Conservative,
        }
    }
}

impl ClassifierPolicy {
    /// Whether duplicate definitions of `name` are expected
    pub fn allows_duplicates(&self, name: &str) -> bool {
        self.reserved_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
            || self.duplicate_allowlist.iter().any(|allowed| allowed == name)
    }
}

/// Verdict for a single symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolClass {
    /// Only referenced, never defined in the collected reports
    Undefined,
    /// Defined under a system-library root
    SystemExempt,
    /// Declared in a scanned header
    HeaderExempt,
    /// Imported by another file
    Referenced,
    /// Exported from a shared library and otherwise unused
    SharedLibraryExposed,
    /// Unreferenced outside its definer; may be made static
    Candidate,
}

/// A symbol reported together with its defining file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub canonical_name: String,
    /// First definition origin in sorted order
    pub origin: String,
    /// Definition origin seen first while ingesting, when it differs from `origin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_linked: Option<String>,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.origin)
    }
}

/// Final outcome of an analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizationReport {
    /// Link invocations that contributed to the table
    pub invocations: usize,
    pub candidates: Vec<Candidate>,
    pub shared_library_exposed: Vec<Candidate>,
    pub warnings: Vec<Warning>,
}

impl LocalizationReport {
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Line printed when nothing was found
    pub fn success_line(&self) -> String {
        format!(
            "No violations found (in {} linker invocations)",
            self.invocations
        )
    }

    /// `name (origin)` for every candidate, in report order
    pub fn candidate_lines(&self) -> Vec<String> {
        self.candidates.iter().map(ToString::to_string).collect()
    }
}

/// Applies exemption and duplicate rules to a populated table
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    policy: ClassifierPolicy,
}

impl Classifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self { policy }
    }

    /// Warnings for symbols defined in more than one file
    pub fn duplicate_definitions(&self, table: &SymbolTable) -> Vec<Warning> {
        table
            .iter()
            .filter(|symbol| symbol.has_multiple_definitions())
            .filter(|symbol| !self.policy.allows_duplicates(&symbol.name))
            .map(|symbol| Warning::DuplicateDefinition {
                symbol: symbol.name.clone(),
                origins: symbol.definition_origins.iter().cloned().collect(),
            })
            .collect()
    }

    /// Decide what a single symbol is
    pub fn classify_symbol(&self, symbol: &Symbol, headers: &HeaderSymbolSet) -> SymbolClass {
        if !symbol.is_defined() {
            return SymbolClass::Undefined;
        }
        if symbol.is_system_symbol(&self.policy.system_roots) {
            return SymbolClass::SystemExempt;
        }
        if headers.contains(&symbol.canonical_name) {
            return SymbolClass::HeaderExempt;
        }
        if !symbol.is_imported() {
            return SymbolClass::Candidate;
        }
        match self.policy.shared_library_policy {
            SharedLibraryPolicy::Separate if !symbol.has_external_import() => {
                SymbolClass::SharedLibraryExposed
            }
            _ => SymbolClass::Referenced,
        }
    }

    /// Run both passes and build the report
    pub fn classify(
        &self,
        table: &SymbolTable,
        headers: &HeaderSymbolSet,
        invocations: usize,
    ) -> LocalizationReport {
        let warnings = self.duplicate_definitions(table);

        let mut candidates = Vec::new();
        let mut shared_library_exposed = Vec::new();
        for symbol in table.iter() {
            let bucket = match self.classify_symbol(symbol, headers) {
                SymbolClass::Candidate => &mut candidates,
                SymbolClass::SharedLibraryExposed => &mut shared_library_exposed,
                SymbolClass::Referenced => {
                    trace!(
                        symbol = %symbol.name,
                        first_use = table.first_import_origin(&symbol.name).unwrap_or("-"),
                        "referenced"
                    );
                    continue;
                }
                _ => continue,
            };
            if let Some(origin) = symbol.first_definition() {
                bucket.push(Candidate {
                    name: symbol.name.clone(),
                    canonical_name: symbol.canonical_name.clone(),
                    origin: origin.to_string(),
                    first_linked: table
                        .first_export_origin(&symbol.name)
                        .filter(|first| *first != origin)
                        .map(str::to_string),
                });
            }
        }

        let by_origin = |a: &Candidate, b: &Candidate| {
            (a.origin.as_str(), a.name.as_str()).cmp(&(b.origin.as_str(), b.name.as_str()))
        };
        candidates.sort_by(by_origin);
        shared_library_exposed.sort_by(by_origin);

        LocalizationReport {
            invocations,
            candidates,
            shared_library_exposed,
            warnings,
        }
    }
}
