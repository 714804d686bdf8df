//! Demangling backends
//!
//! All backends translate a whole batch at once and must return exactly one
//! output per input, in input order.

use crate::error::{LocalizerError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Batch translation of raw linker names into display names
pub trait Demangler: Send + Sync {
    /// Demangle `names`; unrecognized names pass through unchanged
    fn demangle_batch(&self, names: &[String]) -> Result<Vec<String>>;

    /// Get the name of this demangler
    fn name(&self) -> &'static str;
}

/// Which demangler a run should use
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DemanglerKind {
    /// In-process demangling
    #[default]
    Linked,
    /// External `c++filt` compatible tool
    CxxFilt { path: String },
    /// Leave names as they are
    Disabled,
}

impl DemanglerKind {
    pub fn build(&self) -> Box<dyn Demangler> {
        match self {
            DemanglerKind::Linked => Box::new(LinkedDemangler),
            DemanglerKind::CxxFilt { path } => Box::new(CxxFiltDemangler::new(path.clone())),
            DemanglerKind::Disabled => Box::new(NoDemangler),
        }
    }
}

/// Demangles Itanium C++ and Rust names without leaving the process
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedDemangler;

impl Demangler for LinkedDemangler {
    fn demangle_batch(&self, names: &[String]) -> Result<Vec<String>> {
        Ok(names
            .iter()
            .map(|name| symbolic_demangle::demangle(name).into_owned())
            .collect())
    }

    fn name(&self) -> &'static str {
        "linked"
    }
}

/// Pipes the batch through an external `c++filt`
#[derive(Debug, Clone)]
pub struct CxxFiltDemangler {
    path: String,
}

impl Default for CxxFiltDemangler {
    fn default() -> Self {
        Self::new("c++filt")
    }
}

impl CxxFiltDemangler {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Check if the tool can be executed
    pub fn is_available(&self) -> bool {
        Command::new(&self.path)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Demangler for CxxFiltDemangler {
    fn demangle_batch(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LocalizerError::Demangler(format!("failed to execute {}: {}", self.path, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LocalizerError::Demangler(format!("no stdin for {}", self.path)))?;

        // Feed stdin from another thread so a full stdout pipe cannot stall us
        let mut input = names.join("\n");
        input.push('\n');
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| LocalizerError::Demangler(format!("{} did not finish: {}", self.path, e)))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(LocalizerError::Demangler(format!(
                    "failed to write to {}: {}",
                    self.path, e
                )))
            }
            Err(_) => {
                return Err(LocalizerError::Demangler(format!(
                    "writer thread for {} panicked",
                    self.path
                )))
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LocalizerError::Demangler(format!(
                "{} exited with {}: {}",
                self.path,
                output.status,
                stderr.trim()
            )));
        }

        let demangled: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();

        if demangled.len() != names.len() {
            return Err(LocalizerError::Demangler(format!(
                "{} returned {} names for {} inputs",
                self.path,
                demangled.len(),
                names.len()
            )));
        }

        Ok(demangled)
    }

    fn name(&self) -> &'static str {
        "c++filt"
    }
}

/// Pass-through demangler
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDemangler;

impl Demangler for NoDemangler {
    fn demangle_batch(&self, names: &[String]) -> Result<Vec<String>> {
        Ok(names.to_vec())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
