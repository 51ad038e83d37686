//! Version-control status snapshot.
//!
//! Captures the working-tree state before any mutation so an applied
//! fix can always be compared against what the tree looked like going
//! in. Git being absent, or the root not being a repository, degrades
//! to a recorded message - the snapshot is an audit aid, never a gate.

use std::path::Path;
use std::process::Command;

/// Snapshot `git status` and the list of modified files.
pub fn status_snapshot(root: &Path) -> String {
    let mut out = String::new();
    out.push_str(&run_git(root, &["status", "--porcelain=v1"]));
    out.push('\n');
    out.push_str(&run_git(root, &["diff", "--name-only"]));
    out
}

fn run_git(root: &Path, args: &[&str]) -> String {
    let result = Command::new("git").arg("-C").arg(root).args(args).output();
    match result {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).to_string()
        }
        Ok(output) => format!(
            "(git {} failed: {})\n",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => format!("(git unavailable: {})\n", e),
    }
}
