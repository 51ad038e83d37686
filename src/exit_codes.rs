//! Exit code policy for tsmend.
//!
#![allow(dead_code)] // Constants defined for policy documentation, used selectively
//!
//! ## Completion (0)
//!
//! A run that finishes all of its stages exits `0`, even when the
//! checker still reports diagnostics afterwards. Remaining diagnostics
//! are findings recorded in the remaining-anchor artifact, not a tool
//! failure.
//!
//! ## Policy aborts (3-4)
//!
//! The shim guard is a hard gate: it runs before the checker is
//! invoked and before any source file is touched. Its two violation
//! shapes get distinct codes so automation can tell them apart:
//! - `3` = shim contains forbidden content (global declarations,
//!   browser globals, UI-framework namespaces)
//! - `4` = shim has no top-level module declaration
//!
//! ## Usage and operational failures (2, 10)
//!
//! - `2` = usage error (clap's own exit code for bad arguments)
//! - `10` = operational failure (unreadable config, I/O error,
//!   checker binary could not be spawned)
//!
//! This separation allows automation to distinguish between "the tree
//! still has diagnostics" (0 + artifacts), "the shim has drifted"
//! (3-4), and "we couldn't run at all" (10).

/// Exit code: run completed all stages
pub const OK: i32 = 0;

/// Exit code: usage error (owned by clap)
pub const USAGE: i32 = 2;

/// Exit code: shim contains forbidden content (hard abort, pre-mutation)
pub const SHIM_FORBIDDEN: i32 = 3;

/// Exit code: shim missing required module declaration (hard abort, pre-mutation)
pub const SHIM_NO_DECLARATION: i32 = 4;

/// Exit code: general operational failure
pub const OPERATIONAL_FAILURE: i32 = 10;
