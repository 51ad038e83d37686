use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure loaded from tsmend.toml
#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub project: Option<ProjectConfig>,
    pub checker: Option<CheckerConfig>,
    pub caps: Option<CapsConfig>,
    pub imports: Option<ImportsConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ProjectConfig {
    /// Project root; the checker runs with this as its working directory
    pub root: Option<String>,
    /// Source subtree below the root; only files under here are mutated
    pub src_dir: Option<String>,
    /// Declaration-shim file audited by the guard, relative to root
    pub shim: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CheckerConfig {
    /// External checker invocation, program first
    pub command: Option<Vec<String>>,
}

/// Named cap values bounding a single remediation pass.
///
/// Caps keep one pass small and reviewable; they are not correctness
/// requirements.
#[derive(Deserialize, Debug, Default)]
pub struct CapsConfig {
    pub report: Option<usize>,
    pub suppressions: Option<usize>,
    pub imports: Option<usize>,
    pub sweep: Option<usize>,
    pub skips: Option<usize>,
    pub remaining: Option<usize>,
    pub context_files: Option<usize>,
    pub context_lines: Option<usize>,
}

/// Import-injection heuristics. Defaults preserve the historical
/// substring behavior; tokens are configurable per deployment.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ImportsConfig {
    pub base_import: Option<String>,
    pub base_marker: Option<String>,
    pub ui_import: Option<String>,
    pub ui_module: Option<String>,
    pub ui_call_token: Option<String>,
    pub ui_dir_token: Option<String>,
}

/// Resolved cap values with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caps {
    pub report: usize,
    pub suppressions: usize,
    pub imports: usize,
    pub sweep: usize,
    pub skips: usize,
    pub remaining: usize,
    pub context_files: usize,
    pub context_lines: usize,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            report: 200,
            suppressions: 20,
            imports: 15,
            sweep: 200,
            skips: 50,
            remaining: 220,
            context_files: 3,
            context_lines: 30,
        }
    }
}

/// Resolved import-injection heuristics with defaults applied.
#[derive(Debug, Clone)]
pub struct ImportHeuristics {
    /// Statement inserted when the base-library import is missing
    pub base_import: String,
    /// Module whose absence (in any import) triggers the base insert
    pub base_marker: String,
    /// Statement inserted when the UI-library import is missing
    pub ui_import: String,
    /// Module the UI import must come from
    pub ui_module: String,
    /// Call-site substring marking a file as UI-constructing
    pub ui_call_token: String,
    /// Path substring marking a directory as UI-capable
    pub ui_dir_token: String,
}

impl Default for ImportHeuristics {
    fn default() -> Self {
        Self {
            base_import: "import React from \"react\";".to_string(),
            base_marker: "react".to_string(),
            ui_import: "import { view } from \"@forge/ui\";".to_string(),
            ui_module: "@forge/ui".to_string(),
            ui_call_token: "view(".to_string(),
            ui_dir_token: "src/admin".to_string(),
        }
    }
}

impl Config {
    /// Load config from file, or return default if no config exists.
    /// If an explicit path is provided via --config, it MUST exist (error if not).
    /// If no path is provided, check ./tsmend.toml (use default if not found).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                // User explicitly specified a path - it MUST exist
                if !p.exists() {
                    bail!("Config file not found: {}", p.display());
                }
                p
            }
            None => {
                let default_path = Path::new("tsmend.toml");
                if default_path.exists() {
                    default_path
                } else {
                    return Ok(Config::default());
                }
            }
        };

        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", config_path.display(), e))?;

        Ok(config)
    }

    /// Project root, overridable by the --root flag.
    pub fn project_root(&self, cli_root: Option<&Path>) -> PathBuf {
        if let Some(root) = cli_root {
            return root.to_path_buf();
        }
        self.project
            .as_ref()
            .and_then(|p| p.root.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Source subtree, relative to the project root.
    pub fn src_dir(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.src_dir.as_deref())
            .unwrap_or("src")
    }

    /// Declaration-shim path, relative to the project root.
    pub fn shim_path(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.shim.as_deref())
            .unwrap_or("src/types/shims.d.ts")
    }

    /// Checker invocation, program first.
    pub fn checker_command(&self) -> Vec<String> {
        self.checker
            .as_ref()
            .and_then(|c| c.command.clone())
            .unwrap_or_else(|| {
                vec![
                    "npm".to_string(),
                    "run".to_string(),
                    "type-check".to_string(),
                ]
            })
    }

    /// Cap values with defaults applied.
    pub fn caps(&self) -> Caps {
        let defaults = Caps::default();
        let Some(c) = self.caps.as_ref() else {
            return defaults;
        };
        Caps {
            report: c.report.unwrap_or(defaults.report),
            suppressions: c.suppressions.unwrap_or(defaults.suppressions),
            imports: c.imports.unwrap_or(defaults.imports),
            sweep: c.sweep.unwrap_or(defaults.sweep),
            skips: c.skips.unwrap_or(defaults.skips),
            remaining: c.remaining.unwrap_or(defaults.remaining),
            context_files: c.context_files.unwrap_or(defaults.context_files),
            context_lines: c.context_lines.unwrap_or(defaults.context_lines),
        }
    }

    /// Import-injection heuristics with defaults applied.
    pub fn import_heuristics(&self) -> ImportHeuristics {
        let defaults = ImportHeuristics::default();
        let Some(i) = self.imports.as_ref() else {
            return defaults;
        };
        ImportHeuristics {
            base_import: i.base_import.clone().unwrap_or(defaults.base_import),
            base_marker: i.base_marker.clone().unwrap_or(defaults.base_marker),
            ui_import: i.ui_import.clone().unwrap_or(defaults.ui_import),
            ui_module: i.ui_module.clone().unwrap_or(defaults.ui_module),
            ui_call_token: i.ui_call_token.clone().unwrap_or(defaults.ui_call_token),
            ui_dir_token: i.ui_dir_token.clone().unwrap_or(defaults.ui_dir_token),
        }
    }
}
