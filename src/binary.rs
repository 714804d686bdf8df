//! Link report recording
//!
//! Produces the report a linker wrapper would write for linking a given set of
//! ELF relocatable objects. Each object contributes its defined global and weak
//! symbols as exports and its undefined references as imports. When the output
//! is a shared library, exportable definitions are also global exports.

use crate::error::Result;
use crate::report::{LinkReport, SymbolRef};
use std::fs;
use std::path::Path;
use tracing::debug;

pub mod elf;

pub use elf::{DefinedSymbol, ElfObjectReader, ObjectSymbols};

/// Builds link reports from object files
#[derive(Debug, Clone, Default)]
pub struct LinkRecorder {
    reader: ElfObjectReader,
    shared: bool,
}

impl LinkRecorder {
    /// `shared` says whether the link produces a shared library
    pub fn new(shared: bool) -> Self {
        Self {
            reader: ElfObjectReader::new(),
            shared,
        }
    }

    /// Record the link of `objects`, using canonical paths where they resolve
    pub fn record_files<P: AsRef<Path>>(&self, objects: &[P]) -> Result<LinkReport> {
        let mut parsed = Vec::with_capacity(objects.len());

        for object in objects {
            let path = object.as_ref();
            let recorded = fs::canonicalize(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string();
            let symbols = self.reader.read_file(path, &recorded)?;
            debug!(
                object = %recorded,
                defined = symbols.defined.len(),
                weak = symbols.defined.iter().filter(|d| d.weak).count(),
                undefined = symbols.undefined.len(),
                "read object symbols"
            );
            parsed.push(symbols);
        }

        Ok(self.record_objects(&parsed))
    }

    /// Record the link of already parsed objects
    pub fn record_objects(&self, objects: &[ObjectSymbols]) -> LinkReport {
        let mut report = LinkReport::default();

        for object in objects {
            for defined in &object.defined {
                report
                    .exports
                    .push(SymbolRef::new(object.path.as_str(), defined.name.as_str()));
                if self.shared && defined.exportable {
                    report
                        .global_exports
                        .push(SymbolRef::new(object.path.as_str(), defined.name.as_str()));
                }
            }
            for name in &object.undefined {
                report
                    .imports
                    .push(SymbolRef::new(object.path.as_str(), name.as_str()));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects() -> Vec<ObjectSymbols> {
        vec![
            ObjectSymbols {
                path: "/build/a.o".to_string(),
                defined: vec![
                    DefinedSymbol {
                        name: "api".to_string(),
                        weak: false,
                        exportable: true,
                    },
                    DefinedSymbol {
                        name: "internal_helper".to_string(),
                        weak: false,
                        exportable: false,
                    },
                ],
                undefined: vec!["shared_util".to_string()],
            },
            ObjectSymbols {
                path: "/build/b.o".to_string(),
                defined: vec![DefinedSymbol {
                    name: "shared_util".to_string(),
                    weak: true,
                    exportable: true,
                }],
                undefined: vec!["printf".to_string()],
            },
        ]
    }

    #[test]
    fn test_record_executable_link() {
        let report = LinkRecorder::new(false).record_objects(&objects());

        assert_eq!(report.exports.len(), 3);
        assert!(report.global_exports.is_empty());
        assert_eq!(
            report.imports,
            vec![
                SymbolRef::new("/build/a.o", "shared_util"),
                SymbolRef::new("/build/b.o", "printf"),
            ]
        );
    }

    #[test]
    fn test_record_shared_library_link() {
        let report = LinkRecorder::new(true).record_objects(&objects());

        let exported: Vec<&str> = report
            .global_exports
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(exported, vec!["api", "shared_util"]);
    }

    #[test]
    fn test_record_files_propagates_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.o");
        std::fs::write(&bogus, b"not an object").unwrap();

        assert!(LinkRecorder::new(false).record_files(&[bogus]).is_err());
    }
}
