//! # PIIScanner — Sensitive Data Detection
//!
//! Scans event-log artifacts for personally identifiable information:
//! email addresses, US Social Security Numbers, US phone numbers, and
//! 16-digit credit-card-shaped numbers. Detection operates on raw text
//! lines, before any JSON interpretation.
//!
//! An allowlist of regular expressions exempts known-safe strings such as
//! documentation addresses and fixture SSNs. Allowlist matching is
//! prefix-anchored: a pattern exempts a match only if it matches from the
//! first character of the matched text.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use proofgate_core::receipt::Receipt;

/// PII category detected by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiCategory {
    /// Email address.
    Email,
    /// US Social Security Number, `###-##-####`.
    Ssn,
    /// US phone number with optional `-` or `.` separators.
    Phone,
    /// 16-digit credit-card-shaped number with optional groups of 4.
    CreditCard,
}

impl PiiCategory {
    /// All categories, in detection order.
    pub const ALL: [PiiCategory; 4] = [
        PiiCategory::Email,
        PiiCategory::Ssn,
        PiiCategory::Phone,
        PiiCategory::CreditCard,
    ];

    /// Receipt label for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            PiiCategory::Email => "email",
            PiiCategory::Ssn => "ssn",
            PiiCategory::Phone => "phone",
            PiiCategory::CreditCard => "credit_card",
        }
    }

    /// The detection pattern for this category.
    fn pattern(self) -> &'static str {
        match self {
            PiiCategory::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            PiiCategory::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            PiiCategory::Phone => r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
            PiiCategory::CreditCard => r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while building or running the scanner.
#[derive(Error, Debug)]
pub enum PiiScanError {
    /// A built-in detection pattern failed to compile.
    #[error("invalid detection pattern for {category}: {source}")]
    Pattern {
        /// The category whose pattern is broken.
        category: PiiCategory,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// An allowlist entry failed to compile.
    #[error("invalid allowlist pattern '{pattern}': {source}")]
    AllowlistPattern {
        /// The offending allowlist line.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// An artifact could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// The unreadable artifact.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact directory could not be enumerated.
    #[error("cannot read directory {dir}: {source}")]
    ReadDir {
        /// The unreadable directory.
        dir: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// The compiled PII pattern set. Built once at process start, immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct PiiPatterns {
    patterns: Vec<(PiiCategory, Regex)>,
}

impl PiiPatterns {
    /// Compile the standard four-category pattern set.
    pub fn standard() -> Result<Self, PiiScanError> {
        let mut patterns = Vec::with_capacity(PiiCategory::ALL.len());
        for category in PiiCategory::ALL {
            let regex = Regex::new(category.pattern())
                .map_err(|source| PiiScanError::Pattern { category, source })?;
            patterns.push((category, regex));
        }
        Ok(Self { patterns })
    }

    /// The compiled patterns, in detection order.
    pub fn patterns(&self) -> &[(PiiCategory, Regex)] {
        &self.patterns
    }
}

/// Allowlist of regex exceptions.
///
/// Loaded from a newline-separated file; blank lines and lines starting
/// with `#` are ignored. Each entry is compiled prefix-anchored: it
/// exempts a match only when it matches from the first character.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    patterns: Vec<Regex>,
}

impl Allowlist {
    /// The empty allowlist: nothing is exempt.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse allowlist entries from file content.
    pub fn parse(text: &str) -> Result<Self, PiiScanError> {
        let mut patterns = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let anchored = format!(r"\A(?:{line})");
            let regex =
                Regex::new(&anchored).map_err(|source| PiiScanError::AllowlistPattern {
                    pattern: line.to_string(),
                    source,
                })?;
            patterns.push(regex);
        }
        Ok(Self { patterns })
    }

    /// Load an allowlist file. A missing file means an empty allowlist,
    /// not an error: absence of exceptions is the safe default.
    pub fn load(path: &Path) -> Result<Self, PiiScanError> {
        if !path.exists() {
            return Ok(Self::empty());
        }
        let text = fs::read_to_string(path).map_err(|source| PiiScanError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Whether a matched string is exempted by any allowlist entry.
    pub fn exempts(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Number of compiled entries.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no entries are loaded.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// One detected PII-shaped string.
#[derive(Debug, Clone)]
pub struct PiiMatch {
    /// Artifact the match was found in.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Detected category.
    pub category: PiiCategory,
    /// The matched text.
    pub text: String,
    /// Whether an allowlist entry exempts this match.
    pub exempt: bool,
}

/// The PIIScanner, holding compiled patterns and the allowlist.
#[derive(Debug, Clone)]
pub struct PiiScanner {
    patterns: PiiPatterns,
    allowlist: Allowlist,
}

impl PiiScanner {
    /// Construct a scanner from a compiled pattern set and allowlist.
    pub fn new(patterns: PiiPatterns, allowlist: Allowlist) -> Self {
        Self {
            patterns,
            allowlist,
        }
    }

    /// Scan one raw text line with non-overlapping global search per
    /// category. Every match is returned, exempt or not; callers decide
    /// what an exemption means for the aggregate.
    pub fn scan_line(&self, path: &Path, line_no: usize, line: &str) -> Vec<PiiMatch> {
        let mut matches = Vec::new();
        for (category, regex) in self.patterns.patterns() {
            for found in regex.find_iter(line) {
                let text = found.as_str().to_string();
                let exempt = self.allowlist.exempts(&text);
                matches.push(PiiMatch {
                    path: path.to_path_buf(),
                    line: line_no,
                    category: *category,
                    text,
                    exempt,
                });
            }
        }
        matches
    }

    /// Scan one artifact line-by-line. Blank lines are skipped; line
    /// numbers stay physical (1-based over all lines).
    pub fn scan_file(&self, path: &Path) -> Result<Vec<PiiMatch>, PiiScanError> {
        let text = fs::read_to_string(path).map_err(|source| PiiScanError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut matches = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            matches.extend(self.scan_line(path, idx + 1, line));
        }
        Ok(matches)
    }

    /// Scan every `*.jsonl` artifact in a directory, lexicographically.
    ///
    /// A missing directory is not a failure: there is nothing to scan,
    /// and the report says so with zero artifacts.
    pub fn scan_dir(&self, dir: &Path) -> Result<PiiReport, PiiScanError> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "artifact directory absent, nothing to scan");
            return Ok(PiiReport {
                artifacts_scanned: 0,
                matches: Vec::new(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|source| PiiScanError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PiiScanError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                artifacts.push(path);
            }
        }
        artifacts.sort();

        let mut matches = Vec::new();
        for artifact in &artifacts {
            matches.extend(self.scan_file(artifact)?);
        }
        tracing::debug!(
            artifacts = artifacts.len(),
            matches = matches.len(),
            "pii scan complete"
        );
        Ok(PiiReport {
            artifacts_scanned: artifacts.len(),
            matches,
        })
    }
}

/// Outcome of a directory scan.
#[derive(Debug, Clone)]
pub struct PiiReport {
    /// How many artifacts were scanned.
    pub artifacts_scanned: usize,
    matches: Vec<PiiMatch>,
}

impl PiiReport {
    /// Every match found, including exempt ones.
    pub fn matches(&self) -> &[PiiMatch] {
        &self.matches
    }

    /// Matches not covered by the allowlist. These fail the run.
    pub fn violations(&self) -> Vec<&PiiMatch> {
        self.matches.iter().filter(|m| !m.exempt).collect()
    }

    /// True when every match is exempt (or there are none).
    pub fn is_clean(&self) -> bool {
        self.matches.iter().all(|m| m.exempt)
    }

    /// Render the stage receipt.
    ///
    /// FAIL enumerates every unexempted match grouped per artifact; the
    /// terminal token names the first offending artifact in scan order.
    pub fn receipt(&self) -> Receipt {
        let violations = self.violations();
        let Some(first) = violations.first() else {
            return Receipt::pass("PII_SCAN_PASS")
                .with_detail(format!("scanned {} artifacts", self.artifacts_scanned));
        };

        let mut receipt = Receipt::fail(format!(
            "PII_VIOLATIONS_FOUND {}",
            first.path.display()
        ));
        let mut current: Option<&Path> = None;
        for violation in &violations {
            if current != Some(violation.path.as_path()) {
                receipt.push_detail(format!("File: {}", violation.path.display()));
                current = Some(violation.path.as_path());
            }
            receipt.push_detail(format!(
                "  line {}: {} - {}",
                violation.line, violation.category, violation.text
            ));
        }
        receipt
    }
}
