//! CLI argument parsing module
//!
//! This module defines the command-line interface for the localizer tool.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Find global symbols that are never imported by another file
#[derive(Parser, Debug)]
#[command(name = "localizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find global symbols which may be marked as static")]
#[command(long_about = r#"
localizer cross-references the link reports collected during a build (one JSON
report per linker invocation) and lists global functions and variables that no
other translation unit imports. Such symbols can usually be made static or moved
to an anonymous namespace.

Examples:
  localizer analyze ./link-reports                      # Analyze collected reports
  localizer analyze --headers include ./link-reports    # Exempt symbols declared in headers
  localizer --format json analyze ./link-reports        # Output results as JSON
  localizer record -o ld.1.json main.o util.o           # Write the report for one link
"#)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short = 'f', long = "format", global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Suppress colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze link reports and list localization candidates
    Analyze {
        /// Report files or directories holding one report per linker invocation
        #[arg(value_name = "REPORTS", required = true)]
        reports: Vec<PathBuf>,

        /// Do not report symbols declared in headers under this directory
        #[arg(long = "headers", value_name = "DIR")]
        header_roots: Vec<PathBuf>,

        /// Skip unreadable or malformed reports instead of failing
        #[arg(long)]
        best_effort: bool,

        /// Path prefix of system libraries (replaces the defaults /usr/ and /lib/)
        #[arg(long = "system-root", value_name = "PREFIX")]
        system_roots: Vec<String>,

        /// How to demangle symbol names for header matching
        #[arg(long, value_enum, default_value_t = DemanglerChoice::Linked)]
        demangler: DemanglerChoice,

        /// Custom path to c++filt
        #[arg(long, default_value = "c++filt")]
        cxxfilt_path: String,

        /// List shared-library exports with no other use separately
        #[arg(long)]
        separate_shared_exports: bool,
    },

    /// Write the link report for a set of ELF objects
    Record {
        /// Where to write the report
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// The link produces a shared library
        #[arg(long)]
        shared: bool,

        /// Relocatable objects passed to the linker
        #[arg(value_name = "OBJECTS", required = true)]
        objects: Vec<PathBuf>,
    },

    /// Show version information and exit
    Version,

    /// Check availability of external tools (c++filt)
    Tools {
        /// Custom path to c++filt
        #[arg(long, default_value = "c++filt")]
        cxxfilt_path: String,
    },
}

/// Demangler selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemanglerChoice {
    /// Built-in demangler
    Linked,
    /// External c++filt
    Cxxfilt,
    /// Match headers against raw names
    #[value(name = "none")]
    Disabled,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed human-readable output (default)
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Simple text output (minimal formatting)
    Simple,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Simple => write!(f, "simple"),
        }
    }
}
