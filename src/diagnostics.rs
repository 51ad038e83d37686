//! Checker output parsing.
//!
//! Turns the raw captured text of one checker invocation into typed
//! diagnostic records. Parsing is pure text matching: it never opens
//! files and never fails. Lines that match neither the structured
//! diagnostic shape nor one of the recognized code tokens are dropped;
//! only lines that can drive a later fix or be reported are retained.

use regex::Regex;

/// One structured diagnostic reported by the checker.
///
/// Produced by parsing a single output line of the shape
/// `<file>(<line>,<col>): error TS<code>: <message>`.
/// Ordering is the order of appearance in checker output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source file, relative to the project root
    pub file: String,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
    /// Error code, e.g. "TS2307"
    pub code: String,
    /// Message text after the code
    pub message: String,
    /// The full original line
    pub raw: String,
}

/// One retained checker line: the raw text, plus the structured record
/// when the line matches the full diagnostic shape. Lines retained by
/// token match alone (build-tool banners quoting a code, wrapped
/// messages) carry no structured record and feed reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLine {
    pub raw: String,
    pub diagnostic: Option<Diagnostic>,
}

/// Parser for one checker invocation's combined output.
pub struct DiagnosticParser {
    line_re: Regex,
    token_re: Regex,
    module_re: Regex,
}

impl DiagnosticParser {
    /// Build a parser for files under `src_dir` (the configured source
    /// subtree, e.g. "src").
    pub fn new(src_dir: &str) -> Self {
        let dir = regex::escape(src_dir);
        Self {
            line_re: Regex::new(&format!(
                r"^({dir}/[^:(]+\.(?:ts|tsx))\((\d+),(\d+)\): error (TS\d+): (.*)$"
            ))
            .unwrap(),
            token_re: Regex::new(
                r"(error TS|Cannot find module|TS2362|TS2307|TS2552|TS2686|TS6133|TS2578|\.(ts|tsx)\()",
            )
            .unwrap(),
            module_re: Regex::new(r"Cannot find module '([^']+)'").unwrap(),
        }
    }

    /// Parse the full captured text. Returns every retained line in
    /// order of appearance. Absence of matches yields an empty vec.
    pub fn parse(&self, text: &str) -> Vec<AnchorLine> {
        text.lines()
            .filter(|line| self.token_re.is_match(line))
            .map(|line| AnchorLine {
                raw: line.to_string(),
                diagnostic: self.parse_line(line),
            })
            .collect()
    }

    /// Parse a single line against the structured diagnostic shape.
    pub fn parse_line(&self, line: &str) -> Option<Diagnostic> {
        let caps = self.line_re.captures(line)?;
        // Line/column come from \d+ so the parses only fail on
        // pathological overflow; such lines are dropped, not errors.
        let line_no: u32 = caps[2].parse().ok()?;
        let column: u32 = caps[3].parse().ok()?;
        Some(Diagnostic {
            file: caps[1].to_string(),
            line: line_no,
            column,
            code: caps[4].to_string(),
            message: caps[5].to_string(),
            raw: line.to_string(),
        })
    }

    /// Extract the failing module specifier from a module-not-found
    /// diagnostic message.
    pub fn module_specifier(&self, diagnostic: &Diagnostic) -> Option<String> {
        self.module_re
            .captures(&diagnostic.message)
            .map(|caps| caps[1].to_string())
    }
}
