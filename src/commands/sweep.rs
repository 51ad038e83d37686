//! Bulk stale-suppression removal.
//!
//! Consumes the post-fix checker artifact left in OUT_DIR by a prior
//! `tsmend run` and removes every remaining stale suppression up to
//! the sweep cap, grouped by file, highest line first. The larger cap
//! exists because the anchors were already re-verified by the re-run
//! that produced the artifact.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::anchors::AnchorBuckets;
use crate::config::Config;
use crate::diagnostics::DiagnosticParser;
use crate::exit_codes;
use crate::fix::{apply_actions, plan_suppression_removals, FixAction, FixOutcome};
use crate::output::{schema, Output, ReportEnvelope, Severity};
use crate::report::{self, artifacts, ArtifactWriter};

/// JSON data payload for `tsmend sweep`.
#[derive(Debug, Serialize)]
struct SweepData {
    out_dir: String,
    anchors: usize,
    removed: usize,
    skipped: usize,
}

pub fn sweep(
    out_dir: &Path,
    config: &Config,
    cli_root: Option<&Path>,
    output: &Output,
) -> Result<i32> {
    let root = config.project_root(cli_root);
    let caps = config.caps();

    let after_path = out_dir.join(artifacts::CHECK_AFTER);
    if !after_path.exists() {
        bail!(
            "Missing {} - run `tsmend run {}` first",
            after_path.display(),
            out_dir.display()
        );
    }
    let bytes =
        fs::read(&after_path).with_context(|| format!("read {}", after_path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let parser = DiagnosticParser::new(config.src_dir());
    let buckets = AnchorBuckets::classify(&parser, parser.parse(&text));
    let total = buckets.stale_suppressions.len();

    let actions = plan_suppression_removals(&buckets.stale_suppressions, caps.sweep);
    let attempted = actions.len();
    let records = apply_actions(&root, &actions)?;

    let writer = ArtifactWriter::new(out_dir)?;
    writer.write(
        artifacts::SWEEP_LOG,
        &report::suppression_log(&records, attempted, total),
    )?;

    let removed: Vec<&FixAction> = records
        .iter()
        .filter(|r| r.outcome == FixOutcome::Applied)
        .map(|r| &r.action)
        .collect();
    let skipped = records.len() - removed.len();

    if output.is_json() {
        let data = SweepData {
            out_dir: out_dir.display().to_string(),
            anchors: total,
            removed: removed.len(),
            skipped,
        };
        let severity = if total == removed.len() {
            Severity::Converged
        } else {
            Severity::Remaining
        };
        ReportEnvelope::new(schema::SWEEP, data, severity).print()?;
    } else {
        output.data(&format!("REMOVED_COUNT {}", removed.len()));
        for action in removed.iter().take(caps.sweep) {
            if let FixAction::RemoveLine { file, line } = action {
                output.data(&format!("REMOVED {} {}", file, line));
            }
        }
    }

    Ok(exit_codes::OK)
}
