//! Anchor classification.
//!
//! Buckets parsed diagnostics by error code into the actionable
//! categories, preserving appearance order within each bucket. Caps
//! are enforced where a bucket is consumed, not here: classification
//! retains everything so that anchors beyond a cap still show up in
//! reports as not attempted.

use crate::diagnostics::{AnchorLine, Diagnostic, DiagnosticParser};

/// Recognized checker error codes.
pub mod codes {
    #![allow(dead_code)] // The full set documents the retention contract; only some codes drive fixes
    /// Unused '@ts-expect-error' directive (stale suppression)
    pub const STALE_SUPPRESSION: &str = "TS2578";
    /// Cannot find module (unresolved import specifier)
    pub const MODULE_NOT_FOUND: &str = "TS2307";
    /// Arithmetic operand type error (context excerpts only)
    pub const ARITHMETIC_OPERAND: &str = "TS2362";
    /// Declared but never read
    pub const UNUSED_SYMBOL: &str = "TS6133";
    /// Cannot find name, with suggestion
    pub const NAME_NOT_FOUND: &str = "TS2552";
    /// UMD global reference from a module
    pub const UMD_GLOBAL: &str = "TS2686";
}

/// A module-not-found diagnostic paired with its failing specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAnchor {
    pub diagnostic: Diagnostic,
    pub specifier: String,
}

/// Classified diagnostics for one checker invocation.
///
/// `anchors` holds every retained line for reporting; the named
/// buckets hold the structured subsets that drive fixes. Order within
/// every field is order of appearance in checker output.
#[derive(Debug, Default)]
pub struct AnchorBuckets {
    /// All retained lines (structured or token-matched), for reports
    pub anchors: Vec<AnchorLine>,
    /// Stale suppression directives, candidates for line removal
    pub stale_suppressions: Vec<Diagnostic>,
    /// Unresolved relative-import candidates
    pub unresolved_imports: Vec<ImportAnchor>,
    /// Arithmetic-operand errors, excerpted for context reporting
    pub context_candidates: Vec<Diagnostic>,
}

impl AnchorBuckets {
    /// Bucket retained lines by code.
    pub fn classify(parser: &DiagnosticParser, anchors: Vec<AnchorLine>) -> Self {
        let mut buckets = AnchorBuckets::default();

        for anchor in &anchors {
            let Some(diagnostic) = anchor.diagnostic.as_ref() else {
                continue;
            };
            match diagnostic.code.as_str() {
                codes::STALE_SUPPRESSION => {
                    buckets.stale_suppressions.push(diagnostic.clone());
                }
                codes::MODULE_NOT_FOUND => {
                    if let Some(specifier) = parser.module_specifier(diagnostic) {
                        buckets.unresolved_imports.push(ImportAnchor {
                            diagnostic: diagnostic.clone(),
                            specifier,
                        });
                    }
                }
                codes::ARITHMETIC_OPERAND => {
                    buckets.context_candidates.push(diagnostic.clone());
                }
                _ => {}
            }
        }

        buckets.anchors = anchors;
        buckets
    }

    /// Distinct files named by structured diagnostics, in order of
    /// first appearance. Drives the import-injection pass.
    pub fn files(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut files = Vec::new();
        for anchor in &self.anchors {
            if let Some(d) = anchor.diagnostic.as_ref() {
                if seen.insert(d.file.clone()) {
                    files.push(d.file.clone());
                }
            }
        }
        files
    }
}

/// The first `cap` items of a bucket, in appearance order.
pub fn capped<T>(items: &[T], cap: usize) -> &[T] {
    &items[..items.len().min(cap)]
}
