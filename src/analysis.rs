//! Analysis pipeline
//!
//! Ties the stages together: reports are ingested into a symbol table, names
//! are normalized, headers are indexed, and the classifier produces the final
//! [`LocalizationReport`]. Fatal errors can only come out of ingestion, so a
//! report is never produced from a partial view of the build.

pub mod classify;

pub use classify::{
    Candidate, Classifier, ClassifierPolicy, LocalizationReport, SharedLibraryPolicy, SymbolClass,
};

use crate::error::Result;
use crate::headers::{HeaderIndex, HeaderIndexConfig};
use crate::names::{DemanglerKind, NameNormalizer};
use crate::report::{IngestMode, IngestOutcome, LinkReport, ReportIngestor};
use std::path::PathBuf;
use tracing::{debug, info};

/// Settings for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub ingest_mode: IngestMode,
    pub policy: ClassifierPolicy,
    /// Directories whose headers declare public symbols
    pub header_roots: Vec<PathBuf>,
    pub headers: HeaderIndexConfig,
    pub demangler: DemanglerKind,
}

/// Runs the whole cross-reference analysis
pub struct Analyzer {
    ingestor: ReportIngestor,
    header_index: HeaderIndex,
    header_roots: Vec<PathBuf>,
    normalizer: NameNormalizer,
    classifier: Classifier,
}

impl Analyzer {
    /// Create a new analyzer with configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let normalizer = NameNormalizer::new(config.demangler.build());
        debug!(
            mode = ?config.ingest_mode,
            demangler = normalizer.demangler_name(),
            header_roots = config.header_roots.len(),
            "configured analyzer"
        );

        Ok(Self {
            ingestor: ReportIngestor::new(config.ingest_mode),
            header_index: HeaderIndex::new(config.headers)?,
            header_roots: config.header_roots,
            normalizer,
            classifier: Classifier::new(config.policy),
        })
    }

    /// Analyze report files and directories of reports
    pub fn analyze_paths(&self, inputs: &[PathBuf]) -> Result<LocalizationReport> {
        let reports = ReportIngestor::discover(inputs)?;
        info!(reports = reports.len(), "ingesting link reports");

        let outcome = self.ingestor.ingest_files(&reports)?;
        Ok(self.finish(outcome))
    }

    /// Analyze reports that are already in memory
    pub fn analyze_reports(&self, reports: &[LinkReport]) -> LocalizationReport {
        let outcome = self.ingestor.ingest_reports(reports);
        self.finish(outcome)
    }

    fn finish(&self, outcome: IngestOutcome) -> LocalizationReport {
        let IngestOutcome {
            mut table,
            invocations,
            mut warnings,
        } = outcome;

        let normalized = self.normalizer.normalize_batch(&table.names());
        table.assign_canonical_names(normalized.canonical);
        warnings.extend(normalized.warning);

        let headers = self.header_index.index(&self.header_roots);
        info!(
            headers = headers.headers_scanned,
            names = headers.symbols.len(),
            "indexed headers"
        );
        warnings.extend(headers.warnings);

        let mut report = self.classifier.classify(&table, &headers.symbols, invocations);
        debug!(
            symbols = table.len(),
            candidates = report.candidates.len(),
            "classified symbols"
        );

        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }
}
