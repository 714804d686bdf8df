//! Link report module
//!
//! A link report is the record a linker wrapper writes for one linker
//! invocation: which symbols each input file defines, which it references, and
//! which are exported from the resulting shared library. This module defines
//! the wire format and turns a set of reports into a [`crate::SymbolTable`].

pub mod ingest;
pub mod record;

pub use ingest::{apply_report, IngestMode, IngestOutcome, ReportIngestor};
pub use record::{LinkReport, SymbolRef};
