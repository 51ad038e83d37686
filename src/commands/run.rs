//! The full remediation pipeline.
//!
//! Stage order is fixed: vcs snapshot, shim audit + guard gate,
//! checker run, classification, fixes, checker re-run, remaining
//! report. The guard gate is the only abort point; everything after it
//! records anomalies as skips and proceeds to completion.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::anchors::AnchorBuckets;
use crate::checker;
use crate::config::Config;
use crate::diagnostics::DiagnosticParser;
use crate::exit_codes;
use crate::fix::{
    apply_actions, plan_import_insertions, plan_import_rewrites, plan_suppression_removals,
    FixAction, FixOutcome, FixRecord,
};
use crate::output::{schema, Output, ReportEnvelope, Severity};
use crate::reason_codes::SkipReason;
use crate::report::{self, artifacts, ArtifactWriter, RunSummary};
use crate::shim::{discover_shims, ShimGuard};
use crate::vcs;

/// JSON data payload for `tsmend run`.
#[derive(Debug, Serialize)]
struct RunData {
    out_dir: String,
    dry_run: bool,
    summary: RunSummary,
}

pub fn run(
    out_dir: &Path,
    config: &Config,
    cli_root: Option<&Path>,
    dry_run: bool,
    output: &Output,
) -> Result<i32> {
    let root = config.project_root(cli_root);
    let caps = config.caps();
    let heuristics = config.import_heuristics();
    let writer = ArtifactWriter::new(out_dir)?;

    // 0) Snapshot the working tree before anything can change it.
    writer.write(artifacts::STATUS, &vcs::status_snapshot(&root))?;

    // 1) Shim audit and guard gate. A violation aborts here, with the
    // offending excerpts already persisted.
    let mut audit = discover_shims(&root, config.src_dir()).join("\n");
    audit.push('\n');

    let shim_rel = config.shim_path();
    let shim_path = root.join(shim_rel);
    if shim_path.exists() {
        let content = fs::read_to_string(&shim_path)
            .with_context(|| format!("read shim {}", shim_path.display()))?;
        if let Err(violation) = ShimGuard::new().check(&content) {
            audit.push_str(&violation.audit_text(shim_rel));
            writer.write(artifacts::SHIM_AUDIT, &audit)?;
            if output.is_json() {
                let data = serde_json::json!({
                    "out_dir": out_dir.display().to_string(),
                    "violation": violation.to_string(),
                });
                ReportEnvelope::new(schema::RUN, data, Severity::Aborted).print()?;
            } else {
                output.warn(&format!("Aborting: {}", violation));
            }
            return Ok(violation.exit_code());
        }
    }
    writer.write(artifacts::SHIM_AUDIT, &audit)?;

    // 2) Pre-fix checker run.
    output.info("Running type-check...");
    let before = checker::run_checker(
        &root,
        &config.checker_command(),
        &writer.path(artifacts::CHECK_BEFORE),
    )?;

    // 3) Parse and classify.
    output.verbose(&format!("checker exit code: {:?}", before.exit_code));

    let parser = DiagnosticParser::new(config.src_dir());
    let buckets = AnchorBuckets::classify(&parser, parser.parse(&before.output));
    let raw_lines: Vec<String> = buckets.anchors.iter().map(|a| a.raw.clone()).collect();
    writer.write(
        artifacts::ANCHORS_BEFORE,
        &report::anchor_report(&raw_lines, caps.report),
    )?;
    output.verbose(&format!(
        "{} anchor line(s), {} stale suppression(s), {} unresolved import(s)",
        buckets.anchors.len(),
        buckets.stale_suppressions.len(),
        buckets.unresolved_imports.len(),
    ));

    // 4) Plan every fix against the current anchor set.
    let total_suppressions = buckets.stale_suppressions.len();
    let removal_actions =
        plan_suppression_removals(&buckets.stale_suppressions, caps.suppressions);
    let attempted_suppressions = removal_actions.len();

    let (rewrite_actions, plan_skips) =
        plan_import_rewrites(&root, &buckets.unresolved_imports, caps.imports);

    let injection_actions =
        plan_import_insertions(&root, &buckets.files(), &heuristics);

    // 5) Context excerpts for the reporting-only arithmetic bucket.
    writer.write(
        artifacts::CONTEXT,
        &report::context_excerpts(
            &root,
            &buckets.context_candidates,
            caps.context_files,
            caps.context_lines,
        ),
    )?;

    let mut records: Vec<FixRecord> = plan_skips;
    if dry_run {
        let mut planned: Vec<FixAction> = removal_actions.clone();
        planned.extend(rewrite_actions.iter().cloned());
        planned.extend(injection_actions.iter().cloned());
        let plan = report::plan_log(&planned);
        writer.write(artifacts::SUPPRESSION_LOG, &plan)?;
        writer.write(artifacts::IMPORT_LOG, &plan)?;
        writer.write(artifacts::INJECTION_LOG, &plan)?;
        output.info(&format!("Dry run: {} action(s) planned", planned.len()));
    } else {
        let mut all_actions = removal_actions;
        all_actions.extend(rewrite_actions);
        all_actions.extend(injection_actions);
        records.extend(apply_actions(&root, &all_actions)?);

        writer.write(
            artifacts::SUPPRESSION_LOG,
            &report::suppression_log(&records, attempted_suppressions, total_suppressions),
        )?;
        writer.write(
            artifacts::IMPORT_LOG,
            &report::import_log(&records, caps.skips),
        )?;
        writer.write(artifacts::INJECTION_LOG, &report::injection_log(&records))?;
    }

    // 6) Post-fix checker run and remaining-anchor report.
    output.info("Re-running type-check...");
    let after = checker::run_checker(
        &root,
        &config.checker_command(),
        &writer.path(artifacts::CHECK_AFTER),
    )?;
    let remaining = parser.parse(&after.output);
    let remaining_lines: Vec<String> = remaining.iter().map(|a| a.raw.clone()).collect();
    writer.write(
        artifacts::REMAINING,
        &report::anchor_report(&remaining_lines, caps.remaining),
    )?;

    // 7) Summarize.
    let summary = summarize(buckets.anchors.len(), &records, remaining.len());
    if output.is_json() {
        let data = RunData {
            out_dir: out_dir.display().to_string(),
            dry_run,
            summary,
        };
        ReportEnvelope::new(schema::RUN, data, summary.severity()).print()?;
    } else if !output.is_quiet() {
        output.data(&summary.format_human(out_dir));
    }

    Ok(exit_codes::OK)
}

fn summarize(
    anchors_before: usize,
    records: &[FixRecord],
    anchors_remaining: usize,
) -> RunSummary {
    let mut summary = RunSummary {
        anchors_before,
        anchors_remaining,
        ..Default::default()
    };
    for record in records {
        match (&record.action, &record.outcome) {
            (FixAction::RemoveLine { .. }, FixOutcome::Applied) => {
                summary.suppressions_removed += 1;
            }
            (FixAction::RewriteImportSpecifier { .. }, FixOutcome::Applied) => {
                summary.imports_rewritten += 1;
            }
            (FixAction::InsertImportStatement { .. }, FixOutcome::Applied) => {
                summary.imports_injected += 1;
            }
            (_, FixOutcome::Skipped(SkipReason::AlreadyApplied)) => {}
            (_, FixOutcome::Skipped(_)) => summary.skips += 1,
        }
    }
    summary
}
