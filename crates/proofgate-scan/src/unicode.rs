//! # UnicodeGuard — Hidden Character Detection
//!
//! Scans text artifacts for code points that can hide or misrepresent
//! content: bidirectional embedding/override/isolate controls, zero-width
//! characters, and the family of non-breaking and unusual spaces.
//!
//! ## Security Invariant
//!
//! This gate runs before any JSON parsing or schema validation. A schema
//! file laced with bidi overrides could pass naive JSON parsing while
//! reading differently to a human reviewer, so nothing downstream may
//! trust an artifact this gate has not cleared.
//!
//! The detection table is fixed and exhaustive over the three classes. A
//! selected file that fails strict UTF-8 decoding is a violation in its
//! own right, never a silent skip: the guard must not exempt malformed
//! encodings.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use proofgate_core::receipt::Receipt;
use proofgate_core::select::{FileSelector, SelectError};

/// Classification of a detected code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Bidirectional embedding, override, and isolate controls.
    Bidi,
    /// Zero-width characters, including a mid-stream byte-order mark.
    ZeroWidth,
    /// Non-breaking and unusual space characters.
    NbspLike,
}

impl CharClass {
    /// Receipt label for this class.
    pub fn label(self) -> &'static str {
        match self {
            CharClass::Bidi => "BIDI",
            CharClass::ZeroWidth => "ZERO_WIDTH",
            CharClass::NbspLike => "NBSP_LIKE",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry in a detection table: a code point, its Unicode name, and
/// its classification.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    /// The code point to detect.
    pub ch: char,
    /// Unicode character name, used verbatim in receipts.
    pub name: &'static str,
    /// Classification reported for occurrences of this code point.
    pub class: CharClass,
}

/// The fixed set of dangerous code points.
///
/// Nine bidi controls (U+202A..U+202E, U+2066..U+2069), four zero-width
/// characters (U+200B..U+200D, U+FEFF), and fifteen NBSP-like spaces
/// (U+00A0, U+2000..U+200A, U+202F, U+205F, U+3000).
const DANGEROUS: &[TableEntry] = &[
    TableEntry { ch: '\u{202A}', name: "LEFT-TO-RIGHT EMBEDDING", class: CharClass::Bidi },
    TableEntry { ch: '\u{202B}', name: "RIGHT-TO-LEFT EMBEDDING", class: CharClass::Bidi },
    TableEntry { ch: '\u{202C}', name: "POP DIRECTIONAL FORMATTING", class: CharClass::Bidi },
    TableEntry { ch: '\u{202D}', name: "LEFT-TO-RIGHT OVERRIDE", class: CharClass::Bidi },
    TableEntry { ch: '\u{202E}', name: "RIGHT-TO-LEFT OVERRIDE", class: CharClass::Bidi },
    TableEntry { ch: '\u{2066}', name: "LEFT-TO-RIGHT ISOLATE", class: CharClass::Bidi },
    TableEntry { ch: '\u{2067}', name: "RIGHT-TO-LEFT ISOLATE", class: CharClass::Bidi },
    TableEntry { ch: '\u{2068}', name: "FIRST STRONG ISOLATE", class: CharClass::Bidi },
    TableEntry { ch: '\u{2069}', name: "POP DIRECTIONAL ISOLATE", class: CharClass::Bidi },
    TableEntry { ch: '\u{200B}', name: "ZERO WIDTH SPACE", class: CharClass::ZeroWidth },
    TableEntry { ch: '\u{200C}', name: "ZERO WIDTH NON-JOINER", class: CharClass::ZeroWidth },
    TableEntry { ch: '\u{200D}', name: "ZERO WIDTH JOINER", class: CharClass::ZeroWidth },
    TableEntry { ch: '\u{FEFF}', name: "ZERO WIDTH NO-BREAK SPACE", class: CharClass::ZeroWidth },
    TableEntry { ch: '\u{00A0}', name: "NO-BREAK SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2000}', name: "EN QUAD", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2001}', name: "EM QUAD", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2002}', name: "EN SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2003}', name: "EM SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2004}', name: "THREE-PER-EM SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2005}', name: "FOUR-PER-EM SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2006}', name: "SIX-PER-EM SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2007}', name: "FIGURE SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2008}', name: "PUNCTUATION SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{2009}', name: "THIN SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{200A}', name: "HAIR SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{202F}', name: "NARROW NO-BREAK SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{205F}', name: "MEDIUM MATHEMATICAL SPACE", class: CharClass::NbspLike },
    TableEntry { ch: '\u{3000}', name: "IDEOGRAPHIC SPACE", class: CharClass::NbspLike },
];

/// Immutable detection table consulted during scans.
///
/// Built once at construction and never mutated. [`DetectionTable::dangerous`]
/// is the canonical table; custom tables exist so callers can scan for a
/// narrower or wider set without touching the scan algorithm.
#[derive(Debug, Clone)]
pub struct DetectionTable {
    entries: Vec<TableEntry>,
}

impl Default for DetectionTable {
    fn default() -> Self {
        Self::dangerous()
    }
}

impl DetectionTable {
    /// The canonical table: every code point in the BIDI, ZERO_WIDTH, and
    /// NBSP_LIKE sets.
    pub fn dangerous() -> Self {
        Self {
            entries: DANGEROUS.to_vec(),
        }
    }

    /// Build a custom table from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = TableEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up a code point, returning its table entry if dangerous.
    pub fn lookup(&self, ch: char) -> Option<&TableEntry> {
        self.entries.iter().find(|e| e.ch == ch)
    }

    /// All entries in the table.
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }
}

/// What was found at a specific artifact.
#[derive(Debug, Clone)]
pub enum ViolationKind {
    /// A dangerous code point at a 1-based line and column.
    Occurrence {
        /// 1-based line number, splitting on `\n`.
        line: usize,
        /// 1-based character index within the line.
        column: usize,
        /// The offending code point.
        ch: char,
        /// Unicode character name.
        name: &'static str,
        /// Detection class.
        class: CharClass,
    },
    /// The artifact is not valid UTF-8.
    DecodeError {
        /// Decoder complaint.
        detail: String,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Occurrence {
                line,
                column,
                ch,
                name,
                class,
            } => write!(
                f,
                "line {line}, col {column}: {name} (U+{:04X}) {class}",
                *ch as u32
            ),
            ViolationKind::DecodeError { detail } => {
                write!(f, "not valid UTF-8: {detail} DECODE_ERROR")
            }
        }
    }
}

/// One detected occurrence (or decode failure) in one artifact.
#[derive(Debug, Clone)]
pub struct CharacterViolation {
    /// Artifact path, relative to the scan root where possible.
    pub path: PathBuf,
    /// The finding.
    pub kind: ViolationKind,
}

/// Error raised while scanning, distinct from content violations.
#[derive(Error, Debug)]
pub enum UnicodeScanError {
    /// The tree walk failed.
    #[error(transparent)]
    Select(#[from] SelectError),

    /// A selected file could not be read at all.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// The unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// The UnicodeGuard scanner, parameterized by file selector and
/// detection table.
#[derive(Debug, Clone, Default)]
pub struct UnicodeScanner {
    selector: FileSelector,
    table: DetectionTable,
}

impl UnicodeScanner {
    /// Construct a scanner with an explicit selector and table.
    pub fn new(selector: FileSelector, table: DetectionTable) -> Self {
        Self { selector, table }
    }

    /// Scan decoded text, recording every dangerous occurrence with its
    /// 1-based line and column. `path` is recorded on each violation.
    pub fn scan_text(&self, path: &Path, text: &str) -> Vec<CharacterViolation> {
        let mut violations = Vec::new();
        for (line_idx, line) in text.split('\n').enumerate() {
            for (col_idx, ch) in line.chars().enumerate() {
                if let Some(entry) = self.table.lookup(ch) {
                    violations.push(CharacterViolation {
                        path: path.to_path_buf(),
                        kind: ViolationKind::Occurrence {
                            line: line_idx + 1,
                            column: col_idx + 1,
                            ch: entry.ch,
                            name: entry.name,
                            class: entry.class,
                        },
                    });
                }
            }
        }
        violations
    }

    /// Scan one file, decoding as strict UTF-8. A decode failure is a
    /// `DECODE_ERROR` violation for the file, not an error.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<CharacterViolation>, UnicodeScanError> {
        self.scan_file_as(path, path)
    }

    /// Scan `path` but record violations against `record`, so tree scans
    /// can report root-relative paths.
    fn scan_file_as(
        &self,
        path: &Path,
        record: &Path,
    ) -> Result<Vec<CharacterViolation>, UnicodeScanError> {
        let bytes = fs::read(path).map_err(|source| UnicodeScanError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(self.scan_text(record, &text)),
            Err(err) => Ok(vec![CharacterViolation {
                path: record.to_path_buf(),
                kind: ViolationKind::DecodeError {
                    detail: err.utf8_error().to_string(),
                },
            }]),
        }
    }

    /// Scan every selected file under `root`.
    ///
    /// Scanning continues past violations so a single run reports every
    /// finding. Violation paths are recorded relative to `root`.
    pub fn scan_tree(&self, root: &Path) -> Result<UnicodeReport, UnicodeScanError> {
        let files = self.selector.select_files(root)?;
        let mut violations = Vec::new();
        for file in &files {
            let record = file.strip_prefix(root).unwrap_or(file);
            violations.extend(self.scan_file_as(file, record)?);
        }
        tracing::debug!(
            files = files.len(),
            violations = violations.len(),
            "unicode scan complete"
        );
        Ok(UnicodeReport {
            files_scanned: files.len(),
            violations,
        })
    }
}

/// Outcome of a tree scan.
#[derive(Debug, Clone)]
pub struct UnicodeReport {
    /// How many files the selector produced and the scanner decoded.
    pub files_scanned: usize,
    violations: Vec<CharacterViolation>,
}

impl UnicodeReport {
    /// Every violation found, in scan order (files sorted, occurrences in
    /// document order within each file).
    pub fn violations(&self) -> &[CharacterViolation] {
        &self.violations
    }

    /// True when no violation was found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Render the stage receipt.
    ///
    /// PASS names the count of files scanned. FAIL enumerates every
    /// violation grouped per file and lists the offending files in the
    /// terminal token, colon-separated.
    pub fn receipt(&self) -> Receipt {
        if self.is_clean() {
            return Receipt::pass("UNICODE_GUARD_PASS")
                .with_detail(format!("scanned {} files", self.files_scanned));
        }

        let mut receipt = Receipt::fail(format!(
            "UNICODE_GUARD_FAIL {}",
            self.offending_files().join(":")
        ));
        let mut current: Option<&Path> = None;
        for violation in &self.violations {
            if current != Some(violation.path.as_path()) {
                receipt.push_detail(format!("File: {}", violation.path.display()));
                current = Some(violation.path.as_path());
            }
            receipt.push_detail(format!("  {}", violation.kind));
        }
        receipt
    }

    fn offending_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for violation in &self.violations {
            let display = violation.path.display().to_string();
            if files.last() != Some(&display) {
                files.push(display);
            }
        }
        files
    }
}
