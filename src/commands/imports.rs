//! Single-file import repair.
//!
//! Applies the missing-import heuristics to one file, outside the full
//! pipeline. Useful when the checker flags a lone file after a manual
//! edit. A missing file is reported, not an error, so shell loops over
//! globs stay simple.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::exit_codes;
use crate::fix::{apply_actions, insertions_for_content, FixAction, FixOutcome};
use crate::output::{schema, Output, ReportEnvelope, Severity};

/// JSON data payload for `tsmend imports`.
#[derive(Debug, Serialize)]
struct ImportsData {
    file: String,
    found: bool,
    inserted: Vec<String>,
}

pub fn imports(file: &Path, config: &Config, output: &Output) -> Result<i32> {
    let file_str = file.to_string_lossy().replace('\\', "/");

    if !file.exists() {
        if output.is_json() {
            let data = ImportsData {
                file: file_str,
                found: false,
                inserted: vec![],
            };
            ReportEnvelope::new(schema::IMPORTS, data, Severity::Converged).print()?;
        } else {
            output.data(&format!("MISSING {}", file.display()));
        }
        return Ok(exit_codes::OK);
    }

    let content =
        fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let heuristics = config.import_heuristics();
    let actions = insertions_for_content(&file_str, &content, &heuristics);

    // The file path stands alone here, so apply relative to cwd; an
    // absolute path wins over the join.
    let records = apply_actions(Path::new("."), &actions)?;
    let inserted: Vec<String> = records
        .iter()
        .filter(|r| r.outcome == FixOutcome::Applied)
        .filter_map(|r| match &r.action {
            FixAction::InsertImportStatement { statement, .. } => Some(statement.clone()),
            _ => None,
        })
        .collect();

    if output.is_json() {
        let data = ImportsData {
            file: file_str,
            found: true,
            inserted: inserted.clone(),
        };
        ReportEnvelope::new(schema::IMPORTS, data, Severity::Converged).print()?;
    } else if inserted.is_empty() {
        output.data(&format!("No import changes needed for {}", file.display()));
    } else {
        output.data(&format!("Updated imports in {}", file.display()));
        for statement in &inserted {
            output.verbose(&format!("  + {}", statement));
        }
    }

    Ok(exit_codes::OK)
}
