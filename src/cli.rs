//! CLI module for the localizer tool
//!
//! This module provides the command-line interface functionality including
//! argument parsing and output formatting.

pub mod args;
pub mod output;

pub use args::{Args, Commands, DemanglerChoice, OutputFormat};
pub use output::{Color, OutputFormatter};

use crate::analysis::{AnalysisConfig, Analyzer, ClassifierPolicy, SharedLibraryPolicy};
use crate::binary::LinkRecorder;
use crate::names::{CxxFiltDemangler, DemanglerKind};
use crate::report::IngestMode;
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main CLI application runner
pub struct CliApp {
    args: Args,
}

impl CliApp {
    /// Create a new CLI application with parsed arguments
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Run the CLI application
    pub fn run(&self) -> Result<i32> {
        match &self.args.command {
            Commands::Analyze {
                reports,
                header_roots,
                best_effort,
                system_roots,
                demangler,
                cxxfilt_path,
                separate_shared_exports,
            } => {
                let config = self.analysis_config(
                    header_roots,
                    *best_effort,
                    system_roots,
                    *demangler,
                    cxxfilt_path,
                    *separate_shared_exports,
                );
                self.run_analyze(reports, config)
            }
            Commands::Record {
                output,
                shared,
                objects,
            } => self.run_record(output, *shared, objects),
            Commands::Version => self.run_version(),
            Commands::Tools { cxxfilt_path } => self.run_tools(cxxfilt_path),
        }
    }

    fn formatter(&self) -> OutputFormatter {
        OutputFormatter::new(
            self.args.format.clone(),
            !self.args.no_color,
            self.args.verbose,
        )
    }

    /// Build the analysis configuration from `analyze` arguments
    fn analysis_config(
        &self,
        header_roots: &[PathBuf],
        best_effort: bool,
        system_roots: &[String],
        demangler: DemanglerChoice,
        cxxfilt_path: &str,
        separate_shared_exports: bool,
    ) -> AnalysisConfig {
        let mut policy = ClassifierPolicy::default();
        if !system_roots.is_empty() {
            policy.system_roots = system_roots.to_vec();
        }
        if separate_shared_exports {
            policy.shared_library_policy = SharedLibraryPolicy::Separate;
        }

        AnalysisConfig {
            ingest_mode: if best_effort {
                IngestMode::BestEffort
            } else {
                IngestMode::Strict
            },
            policy,
            header_roots: header_roots
                .iter()
                .map(|root| std::path::absolute(root).unwrap_or_else(|_| root.clone()))
                .collect(),
            demangler: match demangler {
                DemanglerChoice::Linked => DemanglerKind::Linked,
                DemanglerChoice::Cxxfilt => DemanglerKind::CxxFilt {
                    path: cxxfilt_path.to_string(),
                },
                DemanglerChoice::Disabled => DemanglerKind::Disabled,
            },
            ..Default::default()
        }
    }

    /// Run the analyze command
    fn run_analyze(&self, reports: &[PathBuf], config: AnalysisConfig) -> Result<i32> {
        debug!(?config, "starting analysis");

        let analyzer = Analyzer::new(config).context("Failed to set up analyzer")?;
        let report = analyzer
            .analyze_paths(reports)
            .context("Failed to analyze link reports")?;

        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        self.formatter()
            .write_report(&mut stdout, &mut stderr, &report)?;

        // Candidates are a finding, not a failure
        Ok(0)
    }

    /// Run the record command
    fn run_record(&self, output: &Path, shared: bool, objects: &[PathBuf]) -> Result<i32> {
        let recorder = LinkRecorder::new(shared);
        let report = recorder
            .record_files(objects)
            .context("Failed to read linker inputs")?;

        report
            .write_to_file(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        let mut stdout = io::stdout();
        self.formatter()
            .write_record_result(&mut stdout, output, &report)?;
        Ok(0)
    }

    /// Run the version command
    fn run_version(&self) -> Result<i32> {
        match self.args.format {
            OutputFormat::Json => {
                let version_info = serde_json::json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "description": env!("CARGO_PKG_DESCRIPTION"),
                    "authors": env!("CARGO_PKG_AUTHORS").split(':').collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&version_info)?);
            }
            _ => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                println!("{}", env!("CARGO_PKG_DESCRIPTION"));
                if self.args.verbose {
                    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
                }
            }
        }
        Ok(0)
    }

    /// Run the tools command to check external tool availability
    fn run_tools(&self, cxxfilt_path: &str) -> Result<i32> {
        let cxxfilt = CxxFiltDemangler::new(cxxfilt_path);
        let available = cxxfilt.is_available();

        match self.args.format {
            OutputFormat::Json => {
                let tools_info = serde_json::json!({
                    "external_tools": {
                        "c++filt": {
                            "available": available,
                            "command": cxxfilt.path(),
                            "description": "Demangles C++ symbol names (used with --demangler cxxfilt)"
                        }
                    }
                });
                println!("{}", serde_json::to_string_pretty(&tools_info)?);
            }
            _ => {
                let formatter = self.formatter();
                println!(
                    "{}",
                    formatter.colorize("External Tools Status", Color::Cyan)
                );
                println!("{}", "=".repeat(21));
                println!();

                let status = if available {
                    formatter.colorize("Available", Color::Green)
                } else {
                    formatter.colorize("Not found", Color::Red)
                };
                println!("c++filt: {}", status);
                println!("  Command: {}", cxxfilt.path());
                println!("  Used for: --demangler cxxfilt");
                if !available {
                    println!("  Install with: sudo apt install binutils (Ubuntu/Debian)");
                    println!("  The built-in demangler works without it.");
                }
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(command: Commands) -> CliApp {
        CliApp::new(Args {
            command,
            verbose: false,
            format: OutputFormat::Simple,
            no_color: true,
        })
    }

    #[test]
    fn test_cli_app_creation() {
        let app = app(Commands::Version);
        assert!(!app.args.verbose);
    }

    #[test]
    fn test_version_command() {
        assert_eq!(app(Commands::Version).run().unwrap(), 0);
    }

    #[test]
    fn test_analysis_config_from_flags() {
        let app = app(Commands::Version);
        let config = app.analysis_config(
            &[PathBuf::from("/abs/include")],
            true,
            &["/opt/sdk/".to_string()],
            DemanglerChoice::Cxxfilt,
            "/usr/bin/c++filt",
            true,
        );

        assert_eq!(config.ingest_mode, IngestMode::BestEffort);
        assert_eq!(config.policy.system_roots, vec!["/opt/sdk/".to_string()]);
        assert_eq!(
            config.policy.shared_library_policy,
            SharedLibraryPolicy::Separate
        );
        assert_eq!(config.header_roots, vec![PathBuf::from("/abs/include")]);
        assert_eq!(
            config.demangler,
            DemanglerKind::CxxFilt {
                path: "/usr/bin/c++filt".to_string()
            }
        );
    }

    #[test]
    fn test_default_config_keeps_system_roots() {
        let app = app(Commands::Version);
        let config = app.analysis_config(&[], false, &[], DemanglerChoice::Linked, "c++filt", false);

        assert_eq!(config.ingest_mode, IngestMode::Strict);
        assert_eq!(config.policy.system_roots, vec!["/usr/", "/lib/"]);
        assert_eq!(config.demangler, DemanglerKind::Linked);
    }

    #[test]
    fn test_analyze_command_runs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ld.1.json"),
            r#"{"exports": [{"file": "a.c", "name": "foo"}], "imports": [], "global_exports": []}"#,
        )
        .unwrap();

        let app = app(Commands::Analyze {
            reports: vec![dir.path().to_path_buf()],
            header_roots: vec![],
            best_effort: false,
            system_roots: vec![],
            demangler: DemanglerChoice::Disabled,
            cxxfilt_path: "c++filt".to_string(),
            separate_shared_exports: false,
        });
        assert_eq!(app.run().unwrap(), 0);
    }

    #[test]
    fn test_analyze_command_fails_on_bad_report() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ld.1.json"), "garbage").unwrap();

        let app = app(Commands::Analyze {
            reports: vec![dir.path().to_path_buf()],
            header_roots: vec![],
            best_effort: false,
            system_roots: vec![],
            demangler: DemanglerChoice::Disabled,
            cxxfilt_path: "c++filt".to_string(),
            separate_shared_exports: false,
        });
        assert!(app.run().is_err());
    }
}
