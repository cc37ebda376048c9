//! # proofgate-scan — Content Scanning Gates
//!
//! The two leaf gates of the proofgate pipeline. Both operate over raw
//! text with no dependency on JSON parsing or schema machinery, which is
//! why they run first: later stages must never be asked to trust an
//! artifact whose bytes could misrepresent their own content.
//!
//! - [`unicode`] — UnicodeGuard. Scans selected files for bidirectional
//!   overrides, zero-width characters, and NBSP-like whitespace. A file
//!   that fails strict UTF-8 decoding is itself a violation.
//! - [`pii`] — PIIScanner. Scans log artifacts for email, SSN, phone,
//!   and credit-card shaped strings, modulated by a regex allowlist.
//!
//! Both scanners are pure: they read the filesystem, mutate nothing, and
//! report every violation found rather than stopping at the first.

pub mod pii;
pub mod unicode;

pub use pii::{Allowlist, PiiCategory, PiiMatch, PiiPatterns, PiiReport, PiiScanError, PiiScanner};
pub use unicode::{
    CharClass, CharacterViolation, DetectionTable, TableEntry, UnicodeReport, UnicodeScanError,
    UnicodeScanner, ViolationKind,
};
