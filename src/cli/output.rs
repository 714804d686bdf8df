//! CLI output formatting module
//!
//! This module renders a [`LocalizationReport`] in the supported output
//! formats (pretty, JSON, CSV, simple text). Warnings go to a separate writer
//! for the text formats so the candidate list stays easy to pipe.

use crate::analysis::{Candidate, LocalizationReport};
use crate::cli::args::OutputFormat;
use crate::diagnostics::Warning;
use crate::report::LinkReport;
use anyhow::Result;
use colored::*;
use std::io::Write;
use std::path::Path;

/// Main output formatter that handles different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_color: bool,
    verbose: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(format: OutputFormat, use_color: bool, verbose: bool) -> Self {
        Self {
            format,
            use_color,
            verbose,
        }
    }

    /// Format and write an analysis report
    pub fn write_report<W: Write, E: Write>(
        &self,
        writer: &mut W,
        warnings: &mut E,
        report: &LocalizationReport,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => self.write_pretty_output(writer, warnings, report),
            OutputFormat::Json => self.write_json_output(writer, report),
            OutputFormat::Csv => self.write_csv_output(writer, warnings, report),
            OutputFormat::Simple => self.write_simple_output(writer, warnings, report),
        }
    }

    /// Write the result of a `record` run
    pub fn write_record_result<W: Write>(
        &self,
        writer: &mut W,
        output: &Path,
        report: &LinkReport,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let summary = serde_json::json!({
                    "record": {
                        "output": output.display().to_string(),
                        "exports": report.exports.len(),
                        "imports": report.imports.len(),
                        "global_exports": report.global_exports.len()
                    }
                });
                writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
            }
            _ => {
                writeln!(
                    writer,
                    "{} {} ({} exports, {} imports, {} global exports)",
                    self.colorize("Wrote", Color::Green),
                    output.display(),
                    report.exports.len(),
                    report.imports.len(),
                    report.global_exports.len()
                )?;
            }
        }
        Ok(())
    }

    /// Write pretty-formatted output
    fn write_pretty_output<W: Write, E: Write>(
        &self,
        writer: &mut W,
        warnings: &mut E,
        report: &LocalizationReport,
    ) -> Result<()> {
        self.write_warnings(warnings, &report.warnings)?;

        if report.has_candidates() {
            writeln!(
                writer,
                "{}",
                self.colorize("Global symbols not imported by any file:", Color::Yellow)
            )?;
            for candidate in &report.candidates {
                self.write_candidate(writer, candidate)?;
            }
        } else {
            writeln!(
                writer,
                "{}",
                self.colorize(&report.success_line(), Color::Green)
            )?;
        }

        if !report.shared_library_exposed.is_empty() {
            writeln!(writer)?;
            writeln!(
                writer,
                "{}",
                self.colorize(
                    "Global symbols only used through shared library exports:",
                    Color::Cyan
                )
            )?;
            for candidate in &report.shared_library_exposed {
                self.write_candidate(writer, candidate)?;
            }
        }

        if self.verbose && report.has_candidates() {
            writeln!(writer)?;
            writeln!(
                writer,
                "{} candidate(s) in {} linker invocations",
                report.candidates.len(),
                report.invocations
            )?;
        }

        Ok(())
    }

    fn write_candidate<W: Write>(&self, writer: &mut W, candidate: &Candidate) -> Result<()> {
        write!(
            writer,
            "  {}",
            self.colorize(&candidate.name, Color::BrightWhite)
        )?;
        if self.verbose && candidate.canonical_name != candidate.name {
            write!(writer, " [{}]", candidate.canonical_name)?;
        }
        write!(writer, " ({})", candidate.origin)?;
        if self.verbose {
            if let Some(first) = &candidate.first_linked {
                write!(writer, ", first linked from {}", first)?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Write JSON output
    fn write_json_output<W: Write>(&self, writer: &mut W, report: &LocalizationReport) -> Result<()> {
        writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
        Ok(())
    }

    /// Write CSV output
    fn write_csv_output<W: Write, E: Write>(
        &self,
        writer: &mut W,
        warnings: &mut E,
        report: &LocalizationReport,
    ) -> Result<()> {
        self.write_warnings(warnings, &report.warnings)?;

        writeln!(writer, "symbol,canonical_name,origin,category")?;
        let rows = report
            .candidates
            .iter()
            .map(|c| (c, "candidate"))
            .chain(
                report
                    .shared_library_exposed
                    .iter()
                    .map(|c| (c, "shared_library_exposed")),
            );
        for (candidate, category) in rows {
            writeln!(
                writer,
                "\"{}\",\"{}\",\"{}\",{}",
                csv_escape(&candidate.name),
                csv_escape(&candidate.canonical_name),
                csv_escape(&candidate.origin),
                category
            )?;
        }
        Ok(())
    }

    /// Write simple text output
    fn write_simple_output<W: Write, E: Write>(
        &self,
        writer: &mut W,
        warnings: &mut E,
        report: &LocalizationReport,
    ) -> Result<()> {
        for warning in &report.warnings {
            writeln!(warnings, "localizer: warning: {}", warning)?;
        }

        if report.has_candidates() {
            writeln!(writer, "Global symbols not imported by any file:")?;
            for line in report.candidate_lines() {
                writeln!(writer, "  {}", line)?;
            }
        } else {
            writeln!(writer, "{}", report.success_line())?;
        }

        if !report.shared_library_exposed.is_empty() {
            writeln!(writer, "Global symbols only used through shared library exports:")?;
            for candidate in &report.shared_library_exposed {
                writeln!(writer, "  {}", candidate)?;
            }
        }
        Ok(())
    }

    fn write_warnings<E: Write>(&self, writer: &mut E, warnings: &[Warning]) -> Result<()> {
        for warning in warnings {
            let label = if self.verbose {
                format!("warning[{}]:", warning.kind())
            } else {
                "warning:".to_string()
            };
            writeln!(writer, "{} {}", self.colorize(&label, Color::Yellow), warning)?;
        }
        Ok(())
    }

    /// Colorize text if colors are enabled
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_color {
            match color {
                Color::Red => text.red().to_string(),
                Color::Green => text.green().to_string(),
                Color::Yellow => text.yellow().to_string(),
                Color::Cyan => text.cyan().to_string(),
                Color::BrightWhite => text.bright_white().to_string(),
            }
        } else {
            text.to_string()
        }
    }
}

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}

/// Available colors for output
#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
    BrightWhite,
}
