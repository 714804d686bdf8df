//! Canonical stems for header matching

use super::demangle::Demangler;
use crate::diagnostics::Warning;
use tracing::{debug, warn};

/// Canonical names for a batch, plus the reason if demangling was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub canonical: Vec<String>,
    pub warning: Option<Warning>,
}

/// Turns raw linker names into canonical stems
pub struct NameNormalizer {
    demangler: Box<dyn Demangler>,
}

impl NameNormalizer {
    pub fn new(demangler: Box<dyn Demangler>) -> Self {
        Self { demangler }
    }

    pub fn demangler_name(&self) -> &'static str {
        self.demangler.name()
    }

    /// Normalize a batch of raw names; `canonical[i]` belongs to `names[i]`.
    ///
    /// A failing demangler does not fail the batch: the names are normalized
    /// undemangled and a warning is returned alongside.
    pub fn normalize_batch(&self, names: &[String]) -> Normalized {
        let unversioned: Vec<String> = names
            .iter()
            .map(|name| strip_symbol_version(name).to_string())
            .collect();

        let (demangled, warning) = match self.demangler.demangle_batch(&unversioned) {
            Ok(out) if out.len() == unversioned.len() => (out, None),
            Ok(out) => {
                let reason = format!(
                    "{} demangler returned {} names for {} inputs",
                    self.demangler.name(),
                    out.len(),
                    unversioned.len()
                );
                (unversioned, Some(Warning::DemanglerFailed { reason }))
            }
            Err(err) => (
                unversioned,
                Some(Warning::DemanglerFailed {
                    reason: err.to_string(),
                }),
            ),
        };

        if let Some(warning) = &warning {
            warn!("{}", warning);
        }

        let canonical = demangled.iter().map(|name| canonical_stem(name)).collect();
        debug!(names = names.len(), demangler = self.demangler.name(), "normalized names");

        Normalized { canonical, warning }
    }
}

/// Remove a trailing symbol version such as `@@GLIBC_2.2.5`.
///
/// MSVC decorated names start with `?` and use `@` internally; they are left
/// alone.
pub fn strip_symbol_version(name: &str) -> &str {
    if name.starts_with('?') {
        return name;
    }
    match name.find('@') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// Find the `)` that closes the `(` at `open`
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Length of an operator token starting at byte `start`, e.g. `operator<<`
fn operator_len(name: &str, start: usize) -> Option<usize> {
    let bytes = name.as_bytes();
    let rest = &bytes[start..];
    if !rest.starts_with(b"operator") {
        return None;
    }
    if start > 0 {
        let prev = bytes[start - 1];
        if prev.is_ascii_alphanumeric() || prev == b'_' {
            return None;
        }
    }

    let after = &rest[b"operator".len()..];
    if after.starts_with(b"()") {
        return Some("operator()".len());
    }
    let symbol_len = after
        .iter()
        .take_while(|b| b"<>=!+-*/%&|^~[],".contains(b))
        .count();
    Some("operator".len() + symbol_len)
}

/// Drop the parameter list of a demangled name.
///
/// The cut happens at the first `(` outside template arguments that does not
/// open a parenthesized scope like `(anonymous namespace)::`. Parentheses
/// inside `{lambda(int)#1}` style scopes are skipped as well.
pub fn strip_parameters(name: &str) -> &str {
    let bytes = name.as_bytes();
    let mut angle_depth = 0usize;
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(len) = operator_len(name, i) {
            i += len;
            continue;
        }
        match bytes[i] {
            b'<' => angle_depth += 1,
            b'>' => angle_depth = angle_depth.saturating_sub(1),
            b'{' => brace_depth += 1,
            b'}' => brace_depth = brace_depth.saturating_sub(1),
            b'(' if angle_depth == 0 && brace_depth == 0 => match matching_paren(bytes, i) {
                Some(close) if name[close + 1..].starts_with("::") => {
                    i = close + 1;
                    continue;
                }
                _ if i == 0 => return name,
                _ => return name[..i].trim_end(),
            },
            _ => {}
        }
        i += 1;
    }

    name
}

/// Text after the last top-level `::`
pub fn innermost_component(name: &str) -> &str {
    let bytes = name.as_bytes();
    let mut angle_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut last = None;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(len) = operator_len(name, i) {
            i += len;
            continue;
        }
        match bytes[i] {
            b'<' => angle_depth += 1,
            b'>' => angle_depth = angle_depth.saturating_sub(1),
            b'(' | b'{' => paren_depth += 1,
            b')' | b'}' => paren_depth = paren_depth.saturating_sub(1),
            b':' if angle_depth == 0
                && paren_depth == 0
                && bytes.get(i + 1) == Some(&b':') =>
            {
                last = Some(i + 2);
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    match last {
        Some(start) if start < name.len() => &name[start..],
        _ => name,
    }
}

/// Drop a trailing template argument list, e.g. `baz<int>` to `baz`.
///
/// An operator token at the start is never cut, so `operator<` and
/// `operator>>` survive while `operator< <int>` loses its arguments.
pub fn strip_template_args(name: &str) -> &str {
    let bytes = name.as_bytes();
    let start = operator_len(name, 0).unwrap_or(0);
    if bytes.len() <= start || bytes[bytes.len() - 1] != b'>' {
        return name;
    }

    let mut depth = 0usize;
    for i in (start..bytes.len()).rev() {
        match bytes[i] {
            b'>' => depth += 1,
            b'<' => {
                depth -= 1;
                if depth == 0 {
                    return match name[..i].trim_end() {
                        "" => name,
                        stem => stem,
                    };
                }
            }
            _ => {}
        }
    }
    name
}

/// Drop a leading return type, as printed for template functions
/// (`void baz` to `baz`). Operator names keep their spaces.
pub fn strip_return_type(name: &str) -> &str {
    if operator_len(name, 0).is_some() {
        return name;
    }
    match name.rfind(' ') {
        Some(pos) if pos + 1 < name.len() => &name[pos + 1..],
        _ => name,
    }
}

/// Canonical stem of an already demangled name
pub fn canonical_stem(demangled: &str) -> String {
    let scoped = innermost_component(strip_parameters(demangled.trim()));
    strip_return_type(strip_template_args(scoped)).to_string()
}
