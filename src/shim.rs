//! Declaration-shim guard.
//!
//! The shim file exists to carry module declarations only. Content
//! drifting beyond that (global scope declarations, browser globals,
//! UI-framework namespaces) indicates the shim is being used to paper
//! over real errors, so the guard aborts the whole run before any
//! checker invocation or file mutation. Violations are written to the
//! audit artifact first; the abort is hard, not a retry.

use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

const FORBIDDEN: &str =
    r"declare global|interface Window|\bdocument\b|\bwindow\b|namespace JSX|HTMLElement|React\.";

/// A shim policy violation. Carries the audit excerpts so the caller
/// can persist them before aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimViolation {
    /// The shim contains at least one forbidden pattern
    ForbiddenContent { excerpts: Vec<String> },
    /// The shim has no top-level module declaration
    MissingDeclaration { head: String },
}

impl ShimViolation {
    /// Audit artifact text for this violation.
    pub fn audit_text(&self, shim_path: &str) -> String {
        match self {
            ShimViolation::ForbiddenContent { excerpts } => {
                let mut out = format!("ERROR: forbidden content in {}\n", shim_path);
                for excerpt in excerpts {
                    out.push_str(excerpt);
                    out.push('\n');
                }
                out
            }
            ShimViolation::MissingDeclaration { head } => {
                format!(
                    "ERROR: shim does not contain module declarations\n{}",
                    head
                )
            }
        }
    }

    /// Exit code for this violation (distinct per shape).
    pub fn exit_code(&self) -> i32 {
        match self {
            ShimViolation::ForbiddenContent { .. } => crate::exit_codes::SHIM_FORBIDDEN,
            ShimViolation::MissingDeclaration { .. } => crate::exit_codes::SHIM_NO_DECLARATION,
        }
    }
}

impl std::fmt::Display for ShimViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShimViolation::ForbiddenContent { excerpts } => {
                write!(f, "shim contains forbidden content ({} match(es))", excerpts.len())
            }
            ShimViolation::MissingDeclaration { .. } => {
                write!(f, "shim does not contain module declarations")
            }
        }
    }
}

/// Validates shim content against the whitelist/blacklist policy.
pub struct ShimGuard {
    forbidden_re: Regex,
    excerpt_re: Regex,
    declaration_re: Regex,
}

impl Default for ShimGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ShimGuard {
    pub fn new() -> Self {
        Self {
            forbidden_re: Regex::new(FORBIDDEN).unwrap(),
            excerpt_re: Regex::new(&format!(r".{{0,60}}(?:{FORBIDDEN}).{{0,60}}")).unwrap(),
            declaration_re: Regex::new(r"(?m)^\s*declare module ").unwrap(),
        }
    }

    /// Validate shim content. `Ok(())` means the repair pipeline may
    /// proceed; `Err` is a hard abort.
    pub fn check(&self, content: &str) -> Result<(), ShimViolation> {
        if self.forbidden_re.is_match(content) {
            let excerpts = self
                .excerpt_re
                .find_iter(content)
                .map(|m| m.as_str().to_string())
                .collect();
            return Err(ShimViolation::ForbiddenContent { excerpts });
        }

        if !self.declaration_re.is_match(content) {
            let head: String = content.chars().take(200).collect();
            return Err(ShimViolation::MissingDeclaration { head });
        }

        Ok(())
    }
}

/// List every declaration file under the source tree, root-relative,
/// sorted. Feeds the shim audit artifact.
pub fn discover_shims(root: &Path, src_dir: &str) -> Vec<String> {
    let base = root.join(src_dir);
    let mut shims: Vec<String> = WalkDir::new(&base)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".d.ts"))
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    shims.sort();
    shims
}
