//! Report ingestion
//!
//! Reports are parsed in parallel, each into its own shard table, and the
//! shards are then merged in input order. Merging is a union by name, so the
//! resulting origin sets do not depend on scheduling.

use super::record::LinkReport;
use crate::diagnostics::Warning;
use crate::error::{LocalizerError, Result};
use crate::symtab::SymbolTable;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What to do with a report that cannot be read or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// Abort the run. Missing one invocation would under-count uses.
    #[default]
    Strict,
    /// Leave the report out and record a warning
    BestEffort,
}

/// Populated table plus what happened while building it
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub table: SymbolTable,
    /// Number of reports that made it into the table
    pub invocations: usize,
    pub warnings: Vec<Warning>,
}

/// Add every record of one report to `table`
pub fn apply_report(table: &mut SymbolTable, report: &LinkReport) {
    for export in &report.exports {
        table.add_export(&export.file, &export.name);
    }
    for import in &report.imports {
        table.add_import(&import.file, &import.name);
    }
    for export in &report.global_exports {
        table.add_global_export(&export.file, &export.name);
    }
}

fn shard_for(report: &LinkReport) -> SymbolTable {
    let mut shard = SymbolTable::new();
    apply_report(&mut shard, report);
    shard
}

/// Builds a symbol table from link reports
#[derive(Debug, Clone, Default)]
pub struct ReportIngestor {
    mode: IngestMode,
}

impl ReportIngestor {
    pub fn new(mode: IngestMode) -> Self {
        Self { mode }
    }

    /// Expand report inputs into report files.
    ///
    /// A directory contributes every regular file directly inside it, sorted
    /// by name. Anything else is taken as a report path as given.
    pub fn discover<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
        let mut reports = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if !input.is_dir() {
                reports.push(input.to_path_buf());
                continue;
            }

            let entries = fs::read_dir(input).map_err(|source| LocalizerError::ReportDirectory {
                path: input.to_path_buf(),
                source,
            })?;

            let mut found = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| LocalizerError::ReportDirectory {
                    path: input.to_path_buf(),
                    source,
                })?;
                let path = entry.path();
                if path.is_file() {
                    found.push(path);
                }
            }
            found.sort();

            debug!(dir = %input.display(), reports = found.len(), "discovered reports");
            reports.extend(found);
        }

        Ok(reports)
    }

    /// Read, parse and merge report files
    pub fn ingest_files(&self, paths: &[PathBuf]) -> Result<IngestOutcome> {
        let shards: Vec<Result<SymbolTable>> = paths
            .par_iter()
            .map(|path| LinkReport::from_file(path).map(|report| shard_for(&report)))
            .collect();

        let mut outcome = IngestOutcome::default();
        for (path, shard) in paths.iter().zip(shards) {
            match shard {
                Ok(shard) => {
                    outcome.table.merge(shard);
                    outcome.invocations += 1;
                }
                Err(err) if self.mode == IngestMode::BestEffort => {
                    warn!(report = %path.display(), error = %err, "skipping unusable report");
                    outcome.warnings.push(Warning::SkippedReport {
                        path: path.display().to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            invocations = outcome.invocations,
            symbols = outcome.table.len(),
            "ingested reports"
        );
        Ok(outcome)
    }

    /// Merge reports that are already in memory
    pub fn ingest_reports(&self, reports: &[LinkReport]) -> IngestOutcome {
        let shards: Vec<SymbolTable> = reports.par_iter().map(shard_for).collect();

        let mut outcome = IngestOutcome::default();
        for shard in shards {
            outcome.table.merge(shard);
            outcome.invocations += 1;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SymbolRef;

    fn write_report(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_apply_report_populates_all_relations() {
        let report = LinkReport {
            exports: vec![SymbolRef::new("a.c", "foo")],
            imports: vec![SymbolRef::new("b.c", "foo")],
            global_exports: vec![SymbolRef::new("lib.c", "api")],
        };
        let mut table = SymbolTable::new();
        apply_report(&mut table, &report);

        let foo = table.get("foo").unwrap();
        assert!(foo.definition_origins.contains("a.c"));
        assert!(foo.import_origins.contains("b.c"));
        assert!(table.get("api").unwrap().is_globally_exported());
    }

    #[test]
    fn test_discover_lists_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "b.json", "{}");
        write_report(dir.path(), "a.json", "{}");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let reports = ReportIngestor::discover(&[dir.path()]).unwrap();
        let names: Vec<_> = reports
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_strict_mode_aborts_on_bad_report() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_report(dir.path(), "1.json", r#"{"exports": [{"file": "a.c", "name": "foo"}]}"#);
        let bad = write_report(dir.path(), "2.json", "{ truncated");

        let ingestor = ReportIngestor::new(IngestMode::Strict);
        let result = ingestor.ingest_files(&[good, bad]);
        assert!(matches!(result, Err(LocalizerError::ReportParse { .. })));
    }

    #[test]
    fn test_best_effort_skips_bad_report_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_report(dir.path(), "1.json", r#"{"exports": [{"file": "a.c", "name": "foo"}]}"#);
        let bad = write_report(dir.path(), "2.json", "{ truncated");
        let missing = dir.path().join("3.json");

        let ingestor = ReportIngestor::new(IngestMode::BestEffort);
        let outcome = ingestor.ingest_files(&[good, bad, missing]).unwrap();

        assert_eq!(outcome.invocations, 1);
        assert!(outcome.table.get("foo").is_some());
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .all(|w| matches!(w, Warning::SkippedReport { .. })));
    }

    #[test]
    fn test_ingest_order_does_not_change_origins() {
        let first = LinkReport {
            exports: vec![SymbolRef::new("a.c", "foo")],
            ..Default::default()
        };
        let second = LinkReport {
            exports: vec![SymbolRef::new("b.c", "foo")],
            imports: vec![SymbolRef::new("c.c", "foo")],
            ..Default::default()
        };

        let ingestor = ReportIngestor::default();
        let forward = ingestor.ingest_reports(&[first.clone(), second.clone()]);
        let backward = ingestor.ingest_reports(&[second, first]);

        assert_eq!(forward.invocations, 2);
        assert_eq!(forward.table.get("foo"), backward.table.get("foo"));
    }
}
