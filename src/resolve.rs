//! Relative import resolution.
//!
//! Given a module specifier the checker failed to resolve and the
//! importing file's directory, probes candidate paths in the module
//! system's own priority order and proposes a corrected specifier.
//! The rewritten specifier must resolve identically when the checker
//! re-runs, so the probe order mirrors the module system exactly:
//! `<spec>.ts`, `<spec>.tsx`, `<spec>/index.ts`, `<spec>/index.tsx`.
//!
//! A last-resort stem-completion probe handles near-miss specifiers
//! (`./util` for an on-disk `utils.ts`): the candidate's directory is
//! scanned for a unique source file whose stem starts with the
//! requested basename. Only a unique match wins, so the fallback stays
//! deterministic.

use std::path::{Path, PathBuf};

use crate::reason_codes::SkipReason;

/// Source extensions eligible for resolution, in probe order.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["ts", "tsx"];

/// Index file names probed when the specifier names a directory.
pub const INDEX_FILES: [&str; 2] = ["index.ts", "index.tsx"];

/// Outcome of resolving one failing specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A candidate exists; rewrite the import to `new_specifier`
    Resolved { new_specifier: String },
    /// Not rewritten; the reason is recorded in the fix log
    Skipped(SkipReason),
}

/// The fixed probe list for a specifier, in priority order. Exposed
/// so the probe-order contract is testable on its own.
pub fn probe_paths(importing_dir: &Path, specifier: &str) -> Vec<PathBuf> {
    let candidate = importing_dir.join(specifier);
    let mut probes = Vec::with_capacity(4);
    for ext in SOURCE_EXTENSIONS {
        probes.push(candidate.with_extension(ext));
    }
    for index in INDEX_FILES {
        probes.push(candidate.join(index));
    }
    probes
}

/// Resolve a failing specifier against the filesystem.
///
/// Only relative specifiers are eligible; package specifiers are the
/// package manager's problem and always skip.
pub fn resolve(importing_dir: &Path, specifier: &str) -> Resolution {
    if !specifier.starts_with('.') {
        return Resolution::Skipped(SkipReason::NonRelativeSpecifier);
    }

    for probe in probe_paths(importing_dir, specifier) {
        if probe.is_file() {
            return Resolution::Resolved {
                new_specifier: respecify(importing_dir, &probe),
            };
        }
    }

    if let Some(completed) = stem_completion(importing_dir, specifier) {
        return Resolution::Resolved {
            new_specifier: respecify(importing_dir, &completed),
        };
    }

    Resolution::Skipped(SkipReason::TargetNotFound)
}

/// Re-express a resolved path as an import specifier relative to the
/// importing directory: strip the source extension, elide a trailing
/// `index` segment, restore the relative marker.
fn respecify(importing_dir: &Path, resolved: &Path) -> String {
    let rel = resolved.strip_prefix(importing_dir).unwrap_or(resolved);
    let mut spec = rel.to_string_lossy().replace('\\', "/");

    for ext in SOURCE_EXTENSIONS {
        let suffix = format!(".{ext}");
        if let Some(stripped) = spec.strip_suffix(&suffix) {
            spec = stripped.to_string();
            break;
        }
    }
    if let Some(stripped) = spec.strip_suffix("/index") {
        spec = stripped.to_string();
    }

    if spec.starts_with('.') {
        spec
    } else {
        format!("./{spec}")
    }
}

/// Unique stem-prefix match in the candidate's directory, or None.
fn stem_completion(importing_dir: &Path, specifier: &str) -> Option<PathBuf> {
    let candidate = importing_dir.join(specifier);
    let parent = candidate.parent()?;
    let wanted = candidate.file_name()?.to_string_lossy().to_string();

    let mut entries: Vec<String> = std::fs::read_dir(parent)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();

    let mut matches = entries.into_iter().filter(|name| {
        let Some((stem, ext)) = name.rsplit_once('.') else {
            return false;
        };
        SOURCE_EXTENSIONS.contains(&ext) && stem.starts_with(wanted.as_str())
    });

    let hit = matches.next()?;
    if matches.next().is_some() {
        // Ambiguous completion; leave the anchor unresolved.
        return None;
    }
    Some(parent.join(hit))
}
