//! # Stage Receipts — Canonical Pass/Fail Outcomes
//!
//! Every gate stage reports its result as a [`Receipt`]: zero or more
//! detail lines followed by exactly one terminal aggregate token.
//!
//! ## Rendering Contract
//!
//! Detail lines precede the terminal token, the terminal token is always
//! the last line, and rendering the same receipt twice produces
//! byte-identical output. Callers print the rendered receipt to stdout and
//! map the verdict to a process exit code.

use std::fmt;

/// Aggregate outcome of a gate stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every item in scope was accepted.
    Pass,
    /// At least one violation or precondition failure occurred.
    Fail,
}

impl Verdict {
    /// Returns true for [`Verdict::Pass`].
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Process exit code for this verdict.
    ///
    /// `0` for pass, `1` for fail. These are the only two exit codes any
    /// stage may produce.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

/// A stage outcome: a terminal token plus ordered detail lines.
///
/// The token is a single line such as `UNICODE_GUARD_PASS` or
/// `SCHEMA_CHECK_FAIL bad.json INVALID_JSON: ...`. Detail lines carry
/// per-item findings and always precede the token in rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    verdict: Verdict,
    token: String,
    details: Vec<String>,
}

impl Receipt {
    /// Construct a passing receipt with the given terminal token.
    pub fn pass(token: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Pass,
            token: token.into(),
            details: Vec::new(),
        }
    }

    /// Construct a failing receipt with the given terminal token.
    pub fn fail(token: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Fail,
            token: token.into(),
            details: Vec::new(),
        }
    }

    /// Append a detail line. Details render in insertion order.
    pub fn push_detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }

    /// Builder-style variant of [`Receipt::push_detail`].
    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    /// The aggregate verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns true if the stage passed.
    pub fn is_pass(&self) -> bool {
        self.verdict.is_pass()
    }

    /// The terminal token line.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The ordered detail lines.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Process exit code for this receipt: `0` on pass, `1` on fail.
    pub fn exit_code(&self) -> u8 {
        self.verdict.exit_code()
    }

    /// Render the receipt: detail lines, then the terminal token, joined
    /// by newlines with no trailing newline.
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = self.details.iter().map(String::as_str).collect();
        lines.push(&self.token);
        lines.join("\n")
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
