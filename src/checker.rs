//! External checker invocation.
//!
//! Runs the configured checker command as a blocking child process
//! with the project root as working directory, streaming stdout and
//! stderr into a single artifact file so the capture is the combined
//! output, verbatim. A non-zero exit from the checker is the normal
//! signal that diagnostics remain - it is data, not a tooling failure.
//! Only a spawn failure (missing binary) is an operational error.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of one checker invocation.
#[derive(Debug)]
pub struct CheckerRun {
    /// Combined stdout/stderr, as captured into the artifact
    pub output: String,
    /// Raw exit code (None when terminated by signal)
    pub exit_code: Option<i32>,
}

/// Invoke the checker, capturing combined output into `artifact`.
///
/// The artifact file is created (truncated) first so a failed spawn
/// still leaves a traceable, empty capture.
pub fn run_checker(root: &Path, command: &[String], artifact: &Path) -> Result<CheckerRun> {
    let Some((program, args)) = command.split_first() else {
        bail!("Checker command is empty");
    };

    let out_file = File::create(artifact)
        .with_context(|| format!("create checker artifact {}", artifact.display()))?;
    let err_file = out_file
        .try_clone()
        .context("clone artifact handle for stderr")?;

    let status = Command::new(program)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out_file))
        .stderr(Stdio::from(err_file))
        .status()
        .with_context(|| format!("spawn checker '{}'", program))?;

    // Checker output may carry non-UTF8 bytes; replace, never fail.
    let bytes = std::fs::read(artifact)
        .with_context(|| format!("read checker artifact {}", artifact.display()))?;

    Ok(CheckerRun {
        output: String::from_utf8_lossy(&bytes).into_owned(),
        exit_code: status.code(),
    })
}
