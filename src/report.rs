//! Run artifacts and the end-of-run report.
//!
//! Every pipeline stage persists a plain-text artifact into the run's
//! output directory so a before/after diff is always possible without
//! re-running anything. The `RunReport` is the stdout summary: stage
//! items in human mode, an envelope payload in JSON mode.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostic;
use crate::fix::{FixAction, FixOutcome, FixRecord};
use crate::output::Severity;
use crate::reason_codes::SkipReason;

/// Stage-numbered artifact file names.
pub mod artifacts {
    /// Version-control status snapshot
    pub const STATUS: &str = "00_status.txt";
    /// Declaration files found + shim guard audit
    pub const SHIM_AUDIT: &str = "01_shim_audit.txt";
    /// Verbatim checker output, pre-fix
    pub const CHECK_BEFORE: &str = "typecheck_before.txt";
    /// Anchor lines extracted from the pre-fix output, capped
    pub const ANCHORS_BEFORE: &str = "03_anchors_before.txt";
    /// Suppression-removal log
    pub const SUPPRESSION_LOG: &str = "04a_suppressions.txt";
    /// Import-rewrite log
    pub const IMPORT_LOG: &str = "04b_imports.txt";
    /// Import-injection log
    pub const INJECTION_LOG: &str = "04c_injected_imports.txt";
    /// Context excerpts for arithmetic-operand anchors
    pub const CONTEXT: &str = "05_context.txt";
    /// Verbatim checker output, post-fix
    pub const CHECK_AFTER: &str = "typecheck_after.txt";
    /// Anchor lines remaining after the fix pass, capped
    pub const REMAINING: &str = "06_remaining.txt";
    /// Sweep-mode removal log
    pub const SWEEP_LOG: &str = "sweep_removals.txt";
}

/// Writes stage artifacts into one run's output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Bind to `dir`, creating it if absent.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Join retained lines, bounded by the report cap.
pub fn anchor_report(lines: &[String], cap: usize) -> String {
    lines[..lines.len().min(cap)].join("\n")
}

/// Suppression-removal log: one line per applied removal, one per
/// skip, and a trailer when the cap left anchors unattempted.
pub fn suppression_log(records: &[FixRecord], attempted: usize, total: usize) -> String {
    let mut out = String::new();
    for record in records {
        let FixAction::RemoveLine { file, line } = &record.action else {
            continue;
        };
        match &record.outcome {
            FixOutcome::Applied => {
                out.push_str(&format!("REMOVED {} line {}\n", file, line));
            }
            FixOutcome::Skipped(reason) => {
                out.push_str(&format!("SKIP: {} line {} ({})\n", file, line, reason));
            }
        }
    }
    if total > attempted {
        out.push_str(&format!("CAPPED: attempted {} of {}\n", attempted, total));
    }
    out
}

/// Import-rewrite log: FIXED lines for applied rewrites, SKIP lines
/// for recorded skips (idempotent no-ops stay silent), skips capped.
pub fn import_log(records: &[FixRecord], skip_cap: usize) -> String {
    let mut out = String::new();
    for record in records {
        let FixAction::RewriteImportSpecifier { file, old, new } = &record.action else {
            continue;
        };
        if record.outcome == FixOutcome::Applied {
            out.push_str(&format!("FIXED import: {} {} -> {}\n", file, old, new));
        }
    }
    let mut skips = 0usize;
    for record in records {
        let FixAction::RewriteImportSpecifier { file, old, .. } = &record.action else {
            continue;
        };
        match &record.outcome {
            FixOutcome::Skipped(SkipReason::AlreadyApplied) => {}
            FixOutcome::Skipped(reason) => {
                if skips < skip_cap {
                    out.push_str(&format!("SKIP: {} {} ({})\n", file, old, reason));
                    skips += 1;
                }
            }
            FixOutcome::Applied => {}
        }
    }
    out
}

/// Injection log: one UPDATED line per file that received an import.
pub fn injection_log(records: &[FixRecord]) -> String {
    let mut out = String::new();
    let mut seen = std::collections::HashSet::new();
    for record in records {
        let FixAction::InsertImportStatement { file, .. } = &record.action else {
            continue;
        };
        if record.outcome == FixOutcome::Applied && seen.insert(file.clone()) {
            out.push_str(&format!("UPDATED {}\n", file));
        }
    }
    out
}

/// Dry-run rendering of a fix plan: what each action would do, with
/// no outcome because nothing was applied.
pub fn plan_log(actions: &[FixAction]) -> String {
    let mut out = String::from("DRY RUN: no files modified\n");
    for action in actions {
        match action {
            FixAction::RemoveLine { file, line } => {
                out.push_str(&format!("PLAN: remove {} line {}\n", file, line));
            }
            FixAction::RewriteImportSpecifier { file, old, new } => {
                out.push_str(&format!("PLAN: rewrite {} {} -> {}\n", file, old, new));
            }
            FixAction::InsertImportStatement { file, statement } => {
                out.push_str(&format!("PLAN: insert {} {}\n", file, statement));
            }
        }
    }
    out
}

/// Context excerpts around the first `files_cap` arithmetic-operand
/// anchors (one per file), `lines_cap` lines either side.
pub fn context_excerpts(
    root: &Path,
    candidates: &[Diagnostic],
    files_cap: usize,
    lines_cap: usize,
) -> String {
    let mut out = String::from("CONTEXT_FILES:\n");
    let mut seen = std::collections::HashSet::new();
    let mut selected: Vec<&Diagnostic> = Vec::new();
    for d in candidates {
        if seen.insert(d.file.clone()) {
            selected.push(d);
        }
        if selected.len() == files_cap {
            break;
        }
    }

    for d in selected {
        let path = root.join(&d.file);
        let Ok(content) = fs::read_to_string(&path) else {
            out.push_str(&format!("MISSING {}\n", d.file));
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();
        let anchor = d.line as usize;
        let start = anchor.saturating_sub(lines_cap).max(1);
        let end = (anchor + lines_cap).min(lines.len());
        out.push_str(&format!(
            "\n--- {}:{} (context {}-{}) ---\n",
            d.file, d.line, start, end
        ));
        for i in start..=end {
            out.push_str(&format!("{:>4} {}\n", i, lines[i - 1]));
        }
    }
    out
}

// =============================================================================
// End-of-run summary
// =============================================================================

/// Counts for one full remediation run (the JSON data payload).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub anchors_before: usize,
    pub suppressions_removed: usize,
    pub imports_rewritten: usize,
    pub imports_injected: usize,
    pub skips: usize,
    pub anchors_remaining: usize,
}

impl RunSummary {
    pub fn severity(&self) -> Severity {
        if self.anchors_remaining == 0 {
            Severity::Converged
        } else {
            Severity::Remaining
        }
    }

    pub fn format_human(&self, out_dir: &Path) -> String {
        let mut out = String::new();
        out.push_str("tsmend run\n\n");
        out.push_str(&format!("  anchors before      {}\n", self.anchors_before));
        out.push_str(&format!(
            "  suppressions removed {}\n",
            self.suppressions_removed
        ));
        out.push_str(&format!("  imports rewritten   {}\n", self.imports_rewritten));
        out.push_str(&format!("  imports injected    {}\n", self.imports_injected));
        out.push_str(&format!("  skips               {}\n", self.skips));
        out.push_str(&format!("  anchors remaining   {}\n\n", self.anchors_remaining));

        let status = match self.severity() {
            Severity::Converged => "Converged: no anchors remain".green().to_string(),
            Severity::Remaining => format!(
                "{} anchor(s) remain; see {}",
                self.anchors_remaining,
                out_dir.join(artifacts::REMAINING).display()
            )
            .yellow()
            .to_string(),
            Severity::Aborted => "Aborted".red().to_string(),
        };
        out.push_str(&status);
        out
    }
}
