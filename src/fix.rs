//! Fix strategies.
//!
//! Fixes run in two stages. Planning turns classified anchors into
//! `FixAction`s: deduplicated, capped, and bound to the current anchor
//! set. Applying processes one file at a time: full read, every one of
//! that file's actions validated and applied against the in-memory
//! content, then a single write only if the content actually changed.
//! A file that cannot be read contributes only skips and is never
//! written. Every action is idempotent: re-applying it to already
//! fixed content is a no-op recorded as `AlreadyApplied`.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::anchors::{capped, ImportAnchor};
use crate::config::ImportHeuristics;
use crate::diagnostics::Diagnostic;
use crate::reason_codes::SkipReason;
use crate::resolve::{self, Resolution};

/// The suppression-directive token a removal must see at the anchor
/// line before deleting it.
pub const SUPPRESSION_DIRECTIVE: &str = "@ts-expect-error";

/// Import insertion scans only this many leading lines for existing
/// import statements.
pub const IMPORT_SCAN_WINDOW: usize = 80;

/// One mechanical edit, bound to a file and validated at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixAction {
    /// Delete exactly the 1-based `line` if it still carries the
    /// suppression directive
    RemoveLine { file: String, line: u32 },
    /// Substitute the quoted `old` specifier with `new`, both quote styles
    RewriteImportSpecifier {
        file: String,
        old: String,
        new: String,
    },
    /// Insert `statement` after the last top-of-file import
    InsertImportStatement { file: String, statement: String },
}

impl FixAction {
    pub fn file(&self) -> &str {
        match self {
            FixAction::RemoveLine { file, .. } => file,
            FixAction::RewriteImportSpecifier { file, .. } => file,
            FixAction::InsertImportStatement { file, .. } => file,
        }
    }
}

/// Outcome of one attempted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied,
    Skipped(SkipReason),
}

/// An action paired with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRecord {
    pub action: FixAction,
    pub outcome: FixOutcome,
}

// =============================================================================
// Planning
// =============================================================================

/// Plan suppression removals from the capped stale-suppression bucket.
/// Deduplicates on (file, line) so one line is removed at most once
/// regardless of duplicate diagnostics.
pub fn plan_suppression_removals(anchors: &[Diagnostic], cap: usize) -> Vec<FixAction> {
    let mut seen = HashSet::new();
    capped(anchors, cap)
        .iter()
        .filter(|d| seen.insert((d.file.clone(), d.line)))
        .map(|d| FixAction::RemoveLine {
            file: d.file.clone(),
            line: d.line,
        })
        .collect()
}

/// Plan import rewrites from the unresolved-import bucket.
///
/// Non-relative specifiers skip without consuming the cap; eligible
/// anchors resolve against the importing file's directory. Rewrites
/// deduplicate on (file, old specifier).
pub fn plan_import_rewrites(
    root: &Path,
    anchors: &[ImportAnchor],
    cap: usize,
) -> (Vec<FixAction>, Vec<FixRecord>) {
    let mut actions = Vec::new();
    let mut skips = Vec::new();
    let mut seen = HashSet::new();
    let mut eligible = 0usize;

    for anchor in anchors {
        let file = &anchor.diagnostic.file;
        let specifier = &anchor.specifier;

        if !specifier.starts_with('.') {
            skips.push(FixRecord {
                action: FixAction::RewriteImportSpecifier {
                    file: file.clone(),
                    old: specifier.clone(),
                    new: specifier.clone(),
                },
                outcome: FixOutcome::Skipped(SkipReason::NonRelativeSpecifier),
            });
            continue;
        }

        eligible += 1;
        if eligible > cap {
            break;
        }

        if !seen.insert((file.clone(), specifier.clone())) {
            continue;
        }

        let source_path = root.join(file);
        let Some(importing_dir) = source_path.parent() else {
            continue;
        };
        if !source_path.exists() {
            skips.push(FixRecord {
                action: FixAction::RewriteImportSpecifier {
                    file: file.clone(),
                    old: specifier.clone(),
                    new: specifier.clone(),
                },
                outcome: FixOutcome::Skipped(SkipReason::FileMissing),
            });
            continue;
        }

        match resolve::resolve(importing_dir, specifier) {
            Resolution::Resolved { new_specifier } => {
                if new_specifier != *specifier {
                    actions.push(FixAction::RewriteImportSpecifier {
                        file: file.clone(),
                        old: specifier.clone(),
                        new: new_specifier,
                    });
                }
            }
            Resolution::Skipped(reason) => {
                skips.push(FixRecord {
                    action: FixAction::RewriteImportSpecifier {
                        file: file.clone(),
                        old: specifier.clone(),
                        new: specifier.clone(),
                    },
                    outcome: FixOutcome::Skipped(reason),
                });
            }
        }
    }

    (actions, skips)
}

/// Plan missing-import insertions for the files named by the anchor
/// set. The heuristics keep the historical substring behavior: a
/// UI-capable file (.tsx) lacking the base-library import gets one,
/// and a file showing the UI-construction call pattern without the
/// UI-library import gets that.
pub fn plan_import_insertions(
    root: &Path,
    files: &[String],
    heuristics: &ImportHeuristics,
) -> Vec<FixAction> {
    let mut actions = Vec::new();
    for file in files {
        let path = root.join(file);
        if !path.exists() {
            continue;
        }
        let is_source = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ts") | Some("tsx")
        );
        if !is_source {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        actions.extend(insertions_for_content(file, &content, heuristics));
    }
    actions
}

/// The insertion decisions for one file's content. Split out so the
/// single-file command can reuse the exact same heuristics.
pub fn insertions_for_content(
    file: &str,
    content: &str,
    heuristics: &ImportHeuristics,
) -> Vec<FixAction> {
    let mut actions = Vec::new();
    let is_ui_kind = file.ends_with(".tsx");

    if is_ui_kind && !has_import_from(content, &heuristics.base_marker) {
        actions.push(FixAction::InsertImportStatement {
            file: file.to_string(),
            statement: heuristics.base_import.clone(),
        });
    }

    let uses_ui_call = content.contains(&heuristics.ui_call_token)
        || (content.contains('<') && is_ui_kind && file.contains(&heuristics.ui_dir_token));
    if uses_ui_call && !has_member_import(content, &ui_member(heuristics), &heuristics.ui_module) {
        actions.push(FixAction::InsertImportStatement {
            file: file.to_string(),
            statement: heuristics.ui_import.clone(),
        });
    }

    actions
}

/// The named member the UI import must bind, derived from the call
/// token ("view(" -> "view").
fn ui_member(heuristics: &ImportHeuristics) -> String {
    heuristics
        .ui_call_token
        .trim_end_matches('(')
        .to_string()
}

fn has_import_from(content: &str, module: &str) -> bool {
    let pattern = format!(r#"from\s+['"]{}['"]"#, regex::escape(module));
    regex::Regex::new(&pattern).unwrap().is_match(content)
}

fn has_member_import(content: &str, member: &str, module: &str) -> bool {
    let pattern = format!(
        r#"import\s+\{{[^}}]*\b{}\b[^}}]*\}}\s+from\s+['"]{}['"]"#,
        regex::escape(member),
        regex::escape(module)
    );
    regex::Regex::new(&pattern).unwrap().is_match(content)
}

// =============================================================================
// Applying
// =============================================================================

/// Apply a plan. Files are processed one at a time in first-appearance
/// order; within a file, removals go highest line first so earlier
/// removals never shift the indices of not-yet-processed anchors, then
/// rewrites, then insertions against the shifted content.
pub fn apply_actions(root: &Path, actions: &[FixAction]) -> Result<Vec<FixRecord>> {
    let mut file_order: Vec<&str> = Vec::new();
    for action in actions {
        if !file_order.contains(&action.file()) {
            file_order.push(action.file());
        }
    }

    let mut records = Vec::new();
    for file in file_order {
        let file_actions: Vec<&FixAction> =
            actions.iter().filter(|a| a.file() == file).collect();
        records.extend(apply_file(root, file, &file_actions)?);
    }
    Ok(records)
}

fn apply_file(root: &Path, file: &str, actions: &[&FixAction]) -> Result<Vec<FixRecord>> {
    let path = root.join(file);
    let Ok(original) = fs::read_to_string(&path) else {
        // Unreadable file: every action skips, nothing is written.
        return Ok(actions
            .iter()
            .map(|a| FixRecord {
                action: (*a).clone(),
                outcome: FixOutcome::Skipped(SkipReason::FileMissing),
            })
            .collect());
    };

    let mut records = Vec::new();
    let mut content = original.clone();

    // Removals first, highest line number first.
    let mut removals: Vec<&FixAction> = actions
        .iter()
        .copied()
        .filter(|a| matches!(a, FixAction::RemoveLine { .. }))
        .collect();
    removals.sort_by_key(|a| match a {
        FixAction::RemoveLine { line, .. } => std::cmp::Reverse(*line),
        _ => std::cmp::Reverse(0),
    });
    for action in removals {
        let FixAction::RemoveLine { line, .. } = action else {
            continue;
        };
        let outcome = remove_line(&mut content, *line);
        records.push(FixRecord {
            action: action.clone(),
            outcome,
        });
    }

    for action in actions {
        match action {
            FixAction::RewriteImportSpecifier { old, new, .. } => {
                let outcome = rewrite_specifier(&mut content, old, new);
                records.push(FixRecord {
                    action: (*action).clone(),
                    outcome,
                });
            }
            FixAction::InsertImportStatement { statement, .. } => {
                let outcome = insert_import(&mut content, statement);
                records.push(FixRecord {
                    action: (*action).clone(),
                    outcome,
                });
            }
            FixAction::RemoveLine { .. } => {}
        }
    }

    if content != original {
        fs::write(&path, &content).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(records)
}

/// Delete the 1-based `line` if it still carries the directive token.
/// Removal is by index, not content search, so duplicate directives
/// elsewhere in the file are never collateral.
fn remove_line(content: &mut String, line: u32) -> FixOutcome {
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    let idx = (line as usize).saturating_sub(1);
    if idx >= lines.len() {
        return FixOutcome::Skipped(SkipReason::DirectiveNotPresent);
    }
    if !lines[idx].contains(SUPPRESSION_DIRECTIVE) {
        return FixOutcome::Skipped(SkipReason::DirectiveNotPresent);
    }
    lines.remove(idx);
    *content = lines.concat();
    FixOutcome::Applied
}

/// Substitute both quoted forms of the old specifier.
fn rewrite_specifier(content: &mut String, old: &str, new: &str) -> FixOutcome {
    let single_old = format!("'{old}'");
    let double_old = format!("\"{old}\"");
    if !content.contains(&single_old) && !content.contains(&double_old) {
        return FixOutcome::Skipped(SkipReason::AlreadyApplied);
    }
    let replaced = content
        .replace(&single_old, &format!("'{new}'"))
        .replace(&double_old, &format!("\"{new}\""));
    *content = replaced;
    FixOutcome::Applied
}

/// Insert the statement after the last top-of-file import (scanning
/// only the leading window), or at the very top when no import exists.
/// No-op when the exact statement text already occurs anywhere.
fn insert_import(content: &mut String, statement: &str) -> FixOutcome {
    if content.contains(statement) {
        return FixOutcome::Skipped(SkipReason::AlreadyApplied);
    }
    let mut lines: Vec<String> = content.split_inclusive('\n').map(String::from).collect();
    let mut last_import: Option<usize> = None;
    for (i, line) in lines.iter().take(IMPORT_SCAN_WINDOW).enumerate() {
        if line.starts_with("import ") {
            last_import = Some(i);
        }
    }
    let insert_at = last_import.map(|i| i + 1).unwrap_or(0);
    lines.insert(insert_at, format!("{statement}\n"));
    *content = lines.concat();
    FixOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticParser;

    fn diag(file: &str, line: u32, code: &str) -> Diagnostic {
        Diagnostic {
            file: file.to_string(),
            line,
            column: 1,
            code: code.to_string(),
            message: String::new(),
            raw: String::new(),
        }
    }

    fn heuristics() -> ImportHeuristics {
        ImportHeuristics::default()
    }

    // ---------------------------------------------------------------
    // Planning
    // ---------------------------------------------------------------

    #[test]
    fn test_plan_removals_caps_in_appearance_order() {
        let anchors: Vec<Diagnostic> = (1..=30)
            .map(|n| diag("src/a.ts", n * 10, "TS2578"))
            .collect();
        let actions = plan_suppression_removals(&anchors, 20);
        assert_eq!(actions.len(), 20);
        assert_eq!(
            actions[0],
            FixAction::RemoveLine {
                file: "src/a.ts".into(),
                line: 10
            }
        );
        assert_eq!(
            actions[19],
            FixAction::RemoveLine {
                file: "src/a.ts".into(),
                line: 200
            }
        );
    }

    #[test]
    fn test_plan_removals_dedupes_duplicate_anchors() {
        let anchors = vec![
            diag("src/a.ts", 5, "TS2578"),
            diag("src/a.ts", 5, "TS2578"),
        ];
        let actions = plan_suppression_removals(&anchors, 20);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_plan_rewrites_skips_non_relative_without_consuming_cap() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.ts"), "import x from './real';\n").unwrap();
        std::fs::write(dir.path().join("src/real.ts"), "export default 1;\n").unwrap();

        let mk = |spec: &str| ImportAnchor {
            diagnostic: diag("src/a.ts", 1, "TS2307"),
            specifier: spec.to_string(),
        };
        // One non-relative followed by one resolvable anchor, cap 1:
        // the package specifier must not use up the cap slot.
        let anchors = vec![mk("@forge/api"), mk("./real")];
        let (actions, skips) = plan_import_rewrites(dir.path(), &anchors, 1);
        assert_eq!(skips.len(), 1);
        assert_eq!(
            skips[0].outcome,
            FixOutcome::Skipped(SkipReason::NonRelativeSpecifier)
        );
        // './real' resolves to itself, so no rewrite is planned, but
        // it consumed the one eligible slot without erroring.
        assert!(actions.is_empty());
    }

    #[test]
    fn test_plan_rewrites_resolves_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.ts"), "import u from './util';\n").unwrap();
        std::fs::write(dir.path().join("src/utils.ts"), "export {};\n").unwrap();

        let anchor = ImportAnchor {
            diagnostic: diag("src/a.ts", 1, "TS2307"),
            specifier: "./util".to_string(),
        };
        let (actions, skips) =
            plan_import_rewrites(dir.path(), &[anchor.clone(), anchor], 15);
        assert!(skips.is_empty());
        assert_eq!(
            actions,
            vec![FixAction::RewriteImportSpecifier {
                file: "src/a.ts".into(),
                old: "./util".into(),
                new: "./utils".into(),
            }]
        );
    }

    #[test]
    fn test_plan_rewrites_records_target_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.ts"), "import g from './gone';\n").unwrap();

        let anchor = ImportAnchor {
            diagnostic: diag("src/a.ts", 1, "TS2307"),
            specifier: "./gone".to_string(),
        };
        let (actions, skips) = plan_import_rewrites(dir.path(), &[anchor], 15);
        assert!(actions.is_empty());
        assert_eq!(
            skips[0].outcome,
            FixOutcome::Skipped(SkipReason::TargetNotFound)
        );
    }

    #[test]
    fn test_plan_insertions_base_import_for_ui_files() {
        let actions = insertions_for_content(
            "src/panel.tsx",
            "export const Panel = () => <div/>;\n",
            &heuristics(),
        );
        assert!(actions.contains(&FixAction::InsertImportStatement {
            file: "src/panel.tsx".into(),
            statement: "import React from \"react\";".into(),
        }));
    }

    #[test]
    fn test_plan_insertions_skips_when_import_present() {
        let actions = insertions_for_content(
            "src/panel.tsx",
            "import React from 'react';\nexport const Panel = () => <div/>;\n",
            &heuristics(),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_plan_insertions_ui_import_on_call_token() {
        let actions = insertions_for_content(
            "src/handlers.ts",
            "export const panel = view({});\n",
            &heuristics(),
        );
        assert_eq!(
            actions,
            vec![FixAction::InsertImportStatement {
                file: "src/handlers.ts".into(),
                statement: "import { view } from \"@forge/ui\";".into(),
            }]
        );
    }

    #[test]
    fn test_plan_insertions_admin_tsx_counts_as_ui_use() {
        let actions = insertions_for_content(
            "src/admin/page.tsx",
            "import React from 'react';\nconst x = <Page/>;\n",
            &heuristics(),
        );
        assert_eq!(
            actions,
            vec![FixAction::InsertImportStatement {
                file: "src/admin/page.tsx".into(),
                statement: "import { view } from \"@forge/ui\";".into(),
            }]
        );
    }

    // ---------------------------------------------------------------
    // Applying
    // ---------------------------------------------------------------

    fn write_file(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn read_file(dir: &Path, rel: &str) -> String {
        std::fs::read_to_string(dir.join(rel)).unwrap()
    }

    #[test]
    fn test_remove_high_to_low_preserves_later_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let mut lines: Vec<String> = (1..=25).map(|n| format!("line {n}")).collect();
        lines[9] = "// @ts-expect-error legacy".to_string(); // line 10
        lines[19] = "// @ts-expect-error legacy".to_string(); // line 20
        write_file(dir.path(), "src/a.ts", &(lines.join("\n") + "\n"));

        // Anchors arrive low-to-high, as the checker reports them.
        let actions = vec![
            FixAction::RemoveLine {
                file: "src/a.ts".into(),
                line: 10,
            },
            FixAction::RemoveLine {
                file: "src/a.ts".into(),
                line: 20,
            },
        ];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert!(records
            .iter()
            .all(|r| r.outcome == FixOutcome::Applied));

        let after = read_file(dir.path(), "src/a.ts");
        assert!(!after.contains(SUPPRESSION_DIRECTIVE));
        // Content originally at lines 10 and 20 is gone; neighbors stay.
        assert!(after.contains("line 9"));
        assert!(after.contains("line 11"));
        assert!(after.contains("line 19"));
        assert!(after.contains("line 21"));
        assert_eq!(after.lines().count(), 23);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/a.ts",
            "keep\n// @ts-expect-error stale\nkeep too\n",
        );
        let actions = vec![FixAction::RemoveLine {
            file: "src/a.ts".into(),
            line: 2,
        }];

        let first = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(first[0].outcome, FixOutcome::Applied);
        let after_first = read_file(dir.path(), "src/a.ts");

        let second = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            second[0].outcome,
            FixOutcome::Skipped(SkipReason::DirectiveNotPresent)
        );
        assert_eq!(read_file(dir.path(), "src/a.ts"), after_first);
    }

    #[test]
    fn test_remove_only_exact_line_among_identical_directives() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/a.ts",
            "// @ts-expect-error first\ncode\n// @ts-expect-error second\n",
        );
        let actions = vec![FixAction::RemoveLine {
            file: "src/a.ts".into(),
            line: 3,
        }];
        apply_actions(dir.path(), &actions).unwrap();
        let after = read_file(dir.path(), "src/a.ts");
        assert!(after.contains("@ts-expect-error first"));
        assert!(!after.contains("@ts-expect-error second"));
    }

    #[test]
    fn test_remove_skips_when_line_moved() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.ts", "plain line\nanother\n");
        let actions = vec![FixAction::RemoveLine {
            file: "src/a.ts".into(),
            line: 1,
        }];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            records[0].outcome,
            FixOutcome::Skipped(SkipReason::DirectiveNotPresent)
        );
        assert_eq!(read_file(dir.path(), "src/a.ts"), "plain line\nanother\n");
    }

    #[test]
    fn test_remove_out_of_range_line_skips() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.ts", "only line\n");
        let actions = vec![FixAction::RemoveLine {
            file: "src/a.ts".into(),
            line: 99,
        }];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            records[0].outcome,
            FixOutcome::Skipped(SkipReason::DirectiveNotPresent)
        );
    }

    #[test]
    fn test_rewrite_covers_both_quote_styles() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/a.ts",
            "import a from './util';\nimport type { B } from \"./util\";\n",
        );
        let actions = vec![FixAction::RewriteImportSpecifier {
            file: "src/a.ts".into(),
            old: "./util".into(),
            new: "./utils".into(),
        }];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(records[0].outcome, FixOutcome::Applied);
        let after = read_file(dir.path(), "src/a.ts");
        assert!(after.contains("from './utils'"));
        assert!(after.contains("from \"./utils\""));
        assert!(!after.contains("./util'") || after.contains("./utils'"));
    }

    #[test]
    fn test_rewrite_already_applied_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.ts", "import a from './utils';\n");
        let actions = vec![FixAction::RewriteImportSpecifier {
            file: "src/a.ts".into(),
            old: "./util".into(),
            new: "./utils".into(),
        }];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            records[0].outcome,
            FixOutcome::Skipped(SkipReason::AlreadyApplied)
        );
    }

    #[test]
    fn test_insert_after_last_import() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/a.tsx",
            "import a from './a';\nimport b from './b';\n\nconst x = 1;\n",
        );
        let actions = vec![FixAction::InsertImportStatement {
            file: "src/a.tsx".into(),
            statement: "import React from \"react\";".into(),
        }];
        apply_actions(dir.path(), &actions).unwrap();
        let after = read_file(dir.path(), "src/a.tsx");
        let lines: Vec<&str> = after.lines().collect();
        assert_eq!(lines[0], "import a from './a';");
        assert_eq!(lines[1], "import b from './b';");
        assert_eq!(lines[2], "import React from \"react\";");
    }

    #[test]
    fn test_insert_at_top_without_imports() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.tsx", "const x = 1;\n");
        let actions = vec![FixAction::InsertImportStatement {
            file: "src/a.tsx".into(),
            statement: "import React from \"react\";".into(),
        }];
        apply_actions(dir.path(), &actions).unwrap();
        let after = read_file(dir.path(), "src/a.tsx");
        assert!(after.starts_with("import React from \"react\";\n"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.tsx", "const x = 1;\n");
        let actions = vec![FixAction::InsertImportStatement {
            file: "src/a.tsx".into(),
            statement: "import React from \"react\";".into(),
        }];
        apply_actions(dir.path(), &actions).unwrap();
        let once = read_file(dir.path(), "src/a.tsx");
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            records[0].outcome,
            FixOutcome::Skipped(SkipReason::AlreadyApplied)
        );
        assert_eq!(read_file(dir.path(), "src/a.tsx"), once);
    }

    #[test]
    fn test_insert_ignores_imports_beyond_scan_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = String::from("import a from './a';\n");
        for _ in 0..IMPORT_SCAN_WINDOW {
            content.push_str("const filler = 0;\n");
        }
        content.push_str("import late from './late';\n");
        write_file(dir.path(), "src/a.tsx", &content);

        let actions = vec![FixAction::InsertImportStatement {
            file: "src/a.tsx".into(),
            statement: "import React from \"react\";".into(),
        }];
        apply_actions(dir.path(), &actions).unwrap();
        let after = read_file(dir.path(), "src/a.tsx");
        let lines: Vec<&str> = after.lines().collect();
        // Inserted after the early import, not after the late one.
        assert_eq!(lines[1], "import React from \"react\";");
    }

    #[test]
    fn test_missing_file_skips_all_actions_without_write() {
        let dir = tempfile::tempdir().unwrap();
        let actions = vec![FixAction::RemoveLine {
            file: "src/ghost.ts".into(),
            line: 1,
        }];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(
            records[0].outcome,
            FixOutcome::Skipped(SkipReason::FileMissing)
        );
        assert!(!dir.path().join("src/ghost.ts").exists());
    }

    #[test]
    fn test_mixed_actions_single_write_per_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "src/a.tsx",
            "import u from './util';\n// @ts-expect-error stale\nconst v = view({});\n",
        );
        let actions = vec![
            FixAction::RemoveLine {
                file: "src/a.tsx".into(),
                line: 2,
            },
            FixAction::RewriteImportSpecifier {
                file: "src/a.tsx".into(),
                old: "./util".into(),
                new: "./utils".into(),
            },
            FixAction::InsertImportStatement {
                file: "src/a.tsx".into(),
                statement: "import { view } from \"@forge/ui\";".into(),
            },
        ];
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert!(records.iter().all(|r| r.outcome == FixOutcome::Applied));
        let after = read_file(dir.path(), "src/a.tsx");
        assert_eq!(
            after,
            "import u from './utils';\nimport { view } from \"@forge/ui\";\nconst v = view({});\n"
        );
    }

    #[test]
    fn test_end_to_end_util_to_utils_rewrite() {
        // The canonical scenario: a.ts imports './util', only
        // 'utils.ts' exists. First pass rewrites; a second pass plans
        // nothing because the anchor is gone and content is fixed.
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/a.ts", "import u from './util';\n");
        write_file(dir.path(), "src/utils.ts", "export {};\n");

        let parser = DiagnosticParser::new("src");
        let text = "src/a.ts(1,15): error TS2307: Cannot find module './util' or its corresponding type declarations.\n";
        let buckets =
            crate::anchors::AnchorBuckets::classify(&parser, parser.parse(text));

        let (actions, skips) =
            plan_import_rewrites(dir.path(), &buckets.unresolved_imports, 15);
        assert!(skips.is_empty());
        let records = apply_actions(dir.path(), &actions).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, FixOutcome::Applied);
        assert_eq!(
            read_file(dir.path(), "src/a.ts"),
            "import u from './utils';\n"
        );

        // Re-check output is clean; second pass sees no anchors.
        let buckets2 = crate::anchors::AnchorBuckets::classify(&parser, parser.parse(""));
        let (actions2, skips2) =
            plan_import_rewrites(dir.path(), &buckets2.unresolved_imports, 15);
        assert!(actions2.is_empty());
        assert!(skips2.is_empty());
    }
}
