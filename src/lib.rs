//! localizer - find global symbols that could be static
//!
//! A library for cross-referencing the symbols exported and imported by every
//! linker invocation of a build. Global symbols that no other translation unit
//! imports, that are not declared in public headers and that do not come from
//! system libraries are reported as candidates for internal linkage.

pub mod analysis;
pub mod binary;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod headers;
pub mod logging;
pub mod names;
pub mod report;
pub mod symtab;

// Re-export main types for convenience
pub use analysis::{
    AnalysisConfig, Analyzer, Candidate, Classifier, ClassifierPolicy, LocalizationReport,
    SharedLibraryPolicy, SymbolClass,
};
pub use binary::LinkRecorder;
pub use cli::{Args, CliApp, OutputFormat};
pub use diagnostics::Warning;
pub use error::{LocalizerError, Result};
pub use headers::{HeaderIndex, HeaderIndexConfig, HeaderSymbolSet};
pub use names::{Demangler, DemanglerKind, NameNormalizer};
pub use report::{IngestMode, LinkReport, ReportIngestor, SymbolRef};
pub use symtab::{Symbol, SymbolTable};
