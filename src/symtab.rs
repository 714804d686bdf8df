//! Whole-program symbol table
//!
//! Maps raw linker names to the files that define and reference them. A table
//! is built fresh for every run, filled by the report ingestor and read by the
//! classifier once population is complete.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Aggregated definition and use provenance of one linker symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Exact name emitted by the linker, possibly mangled
    pub name: String,
    /// Demangled, unqualified stem used for header matching
    pub canonical_name: String,
    /// Files that define the symbol
    pub definition_origins: BTreeSet<String>,
    /// Files that import the symbol
    pub import_origins: BTreeSet<String>,
    /// Files that export the symbol across a shared-library boundary
    pub global_export_origins: BTreeSet<String>,
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            canonical_name: name.to_string(),
            definition_origins: BTreeSet::new(),
            import_origins: BTreeSet::new(),
            global_export_origins: BTreeSet::new(),
        }
    }

    pub fn has_multiple_definitions(&self) -> bool {
        self.definition_origins.len() > 1
    }

    pub fn is_defined(&self) -> bool {
        !self.definition_origins.is_empty()
    }

    /// Smallest definition origin in sorted order
    pub fn first_definition(&self) -> Option<&str> {
        self.definition_origins.iter().next().map(String::as_str)
    }

    pub fn is_globally_exported(&self) -> bool {
        !self.global_export_origins.is_empty()
    }

    /// Import origins other than the symbol's own definers
    pub fn external_imports(&self) -> impl Iterator<Item = &str> {
        self.import_origins
            .iter()
            .filter(|origin| !self.definition_origins.contains(*origin))
            .map(String::as_str)
    }

    pub fn has_external_import(&self) -> bool {
        self.external_imports().next().is_some()
    }

    /// Referenced from outside its definers, or exposed from a shared library
    pub fn is_imported(&self) -> bool {
        self.is_globally_exported() || self.has_external_import()
    }

    /// Whether any definition lives under one of the given system roots
    pub fn is_system_symbol(&self, system_roots: &[String]) -> bool {
        self.definition_origins
            .iter()
            .any(|origin| system_roots.iter().any(|root| origin.starts_with(root.as_str())))
    }

    fn absorb(&mut self, other: Symbol) {
        self.definition_origins.extend(other.definition_origins);
        self.import_origins.extend(other.import_origins);
        self.global_export_origins.extend(other.global_export_origins);
    }
}

/// Name-keyed table of every symbol seen in the collected reports
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
    // First origin seen per name, in arrival order; one entry per name
    first_imports: HashMap<String, String>,
    first_exports: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the symbol called `name`, creating it on first reference
    pub fn get_or_create(&mut self, name: &str) -> &mut Symbol {
        self.symbols
            .entry(name.to_string())
            .or_insert_with(|| Symbol::new(name))
    }

    /// Record `name` as defined in `origin`
    pub fn add_export(&mut self, origin: &str, name: &str) {
        self.get_or_create(name)
            .definition_origins
            .insert(origin.to_string());
        self.first_exports
            .entry(name.to_string())
            .or_insert_with(|| origin.to_string());
    }

    /// Record `name` as referenced from `origin`
    pub fn add_import(&mut self, origin: &str, name: &str) {
        self.get_or_create(name)
            .import_origins
            .insert(origin.to_string());
        self.first_imports
            .entry(name.to_string())
            .or_insert_with(|| origin.to_string());
    }

    /// Record `name` as exported from a shared library built from `origin`.
    ///
    /// This counts as a use: a library export may have consumers the build
    /// never shows us.
    pub fn add_global_export(&mut self, origin: &str, name: &str) {
        self.get_or_create(name)
            .global_export_origins
            .insert(origin.to_string());
        self.first_imports
            .entry(name.to_string())
            .or_insert_with(|| origin.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols ordered by raw name
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Raw names in table order
    pub fn names(&self) -> Vec<String> {
        self.symbols.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// First origin that exported `name`, in arrival order
    pub fn first_export_origin(&self, name: &str) -> Option<&str> {
        self.first_exports.get(name).map(String::as_str)
    }

    /// First origin that imported or globally exported `name`, in arrival order
    pub fn first_import_origin(&self, name: &str) -> Option<&str> {
        self.first_imports.get(name).map(String::as_str)
    }

    /// Union another table into this one, name by name.
    ///
    /// Origin sets end up the same whatever order shards are merged in; the
    /// first-seen origins follow merge order.
    pub fn merge(&mut self, other: SymbolTable) {
        for (name, symbol) in other.symbols {
            match self.symbols.get_mut(&name) {
                Some(existing) => existing.absorb(symbol),
                None => {
                    self.symbols.insert(name, symbol);
                }
            }
        }
        for (name, origin) in other.first_imports {
            self.first_imports.entry(name).or_insert(origin);
        }
        for (name, origin) in other.first_exports {
            self.first_exports.entry(name).or_insert(origin);
        }
    }

    /// Attach canonical names, given in the same order as [`SymbolTable::names`]
    pub fn assign_canonical_names(&mut self, canonical: Vec<String>) {
        debug_assert_eq!(canonical.len(), self.symbols.len());
        for (symbol, canonical_name) in self.symbols.values_mut().zip(canonical) {
            symbol.canonical_name = canonical_name;
        }
    }
}
