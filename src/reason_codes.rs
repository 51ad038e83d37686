//! Skip reasons for fix decisions.
//!
//! Provides a taxonomy of reasons why an anchor was not mutated.
//! These are stable identifiers for automation - the enum variants are
//! the contract, and `label()` is the exact token written into the
//! per-category fix logs.

use serde::Serialize;

/// Reason a planned or attempted fix was skipped.
///
/// Categorized into three groups:
/// - **Policy**: Intentional restrictions (eligibility rules, caps)
/// - **Unresolved**: The fix target cannot be found on disk
/// - **NonActionable**: The file state no longer matches the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Specifier does not start with a relative-path marker; package
    /// imports are never rewritten
    NonRelativeSpecifier,
    /// No probe candidate for the specifier exists on disk
    TargetNotFound,
    /// The anchor line no longer carries the suppression directive
    DirectiveNotPresent,
    /// The file named by the anchor does not exist under the source tree
    FileMissing,
    /// The content already carries the fix; the action is a no-op
    AlreadyApplied,
}

impl SkipReason {
    /// The token recorded in fix-log `SKIP:` lines.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NonRelativeSpecifier => "non-relative",
            SkipReason::TargetNotFound => "target not found",
            SkipReason::DirectiveNotPresent => "directive not present at anchor line",
            SkipReason::FileMissing => "file missing",
            SkipReason::AlreadyApplied => "already applied",
        }
    }

    /// Category of the skip reason.
    pub fn category(&self) -> ReasonCategory {
        match self {
            SkipReason::NonRelativeSpecifier => ReasonCategory::Policy,
            SkipReason::TargetNotFound => ReasonCategory::Unresolved,
            SkipReason::DirectiveNotPresent
            | SkipReason::FileMissing
            | SkipReason::AlreadyApplied => ReasonCategory::NonActionable,
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of skip reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonCategory {
    /// Intentional restrictions (eligibility, caps)
    Policy,
    /// Fix target missing on disk
    Unresolved,
    /// File state diverged from the anchor
    NonActionable,
}
