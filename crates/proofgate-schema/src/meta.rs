//! # SchemaMetaValidator — Schema-of-Schemas Checks
//!
//! Classifies each schema document as meta-valid or not. A document is
//! meta-valid only if it parses as JSON, declares a supported dialect in
//! `$schema`, and conforms to that dialect's own schema for schemas.
//!
//! ## Classification Ladder
//!
//! Per document, terminal at the first failure:
//!
//! 1. `INVALID_JSON` — the bytes are not a JSON document.
//! 2. `MISSING_DIALECT` — no usable `$schema` declaration.
//! 3. `UNSUPPORTED_DIALECT` — the declared URI is outside the capability
//!    table.
//! 4. `INVALID_SCHEMA_STRUCTURE` — the document violates the dialect's
//!    metaschema, carrying the underlying structural complaint.
//!
//! Document iteration is lexicographic by filename, which fixes the
//! per-file receipt line order across runs on the same input set.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use proofgate_core::receipt::Receipt;

use crate::dialect::Dialect;

/// Terminal classification for a document that failed meta-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaFailure {
    /// The bytes are not valid JSON.
    InvalidJson {
        /// Parser complaint.
        detail: String,
    },
    /// The document carries no `$schema` string.
    MissingDialect,
    /// The declared dialect URI is not in the capability table.
    UnsupportedDialect {
        /// The unrecognized URI.
        uri: String,
    },
    /// The document violates its dialect's metaschema.
    InvalidStructure {
        /// The structural complaint from the metaschema check.
        detail: String,
    },
}

impl MetaFailure {
    /// The classification token for receipts.
    pub fn token(&self) -> &'static str {
        match self {
            MetaFailure::InvalidJson { .. } => "INVALID_JSON",
            MetaFailure::MissingDialect => "MISSING_DIALECT",
            MetaFailure::UnsupportedDialect { .. } => "UNSUPPORTED_DIALECT",
            MetaFailure::InvalidStructure { .. } => "INVALID_SCHEMA_STRUCTURE",
        }
    }
}

impl fmt::Display for MetaFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaFailure::InvalidJson { detail } => write!(f, "INVALID_JSON: {detail}"),
            MetaFailure::MissingDialect => {
                write!(f, "MISSING_DIALECT: no $schema declaration")
            }
            MetaFailure::UnsupportedDialect { uri } => {
                write!(f, "UNSUPPORTED_DIALECT: {uri}")
            }
            MetaFailure::InvalidStructure { detail } => {
                write!(f, "INVALID_SCHEMA_STRUCTURE: {detail}")
            }
        }
    }
}

/// Outcome of meta-validating one schema document.
#[derive(Debug, Clone)]
pub struct DocumentCheck {
    /// Schema filename (not the full path; directories are scanned flat).
    pub file: String,
    /// Resolved dialect on success, classification on failure.
    pub outcome: Result<Dialect, MetaFailure>,
}

/// Environment error, distinct from a content classification.
///
/// The schema corpus is a required dependency of the pipeline: a missing
/// or empty schema directory is fatal, unlike an absent proofs directory.
#[derive(Error, Debug)]
pub enum MetaError {
    /// The schema directory does not exist.
    #[error("schema directory not found: {dir}")]
    MissingDir {
        /// The expected directory.
        dir: PathBuf,
    },

    /// The schema directory contains no `*.json` documents.
    #[error("no schema documents found in {dir}")]
    EmptyDir {
        /// The empty directory.
        dir: PathBuf,
    },

    /// The directory could not be enumerated.
    #[error("cannot read directory {dir}: {source}")]
    ReadDir {
        /// The unreadable directory.
        dir: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// The unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// The meta-validation gate.
///
/// Stateless; construction exists so the capability table and any future
/// configuration load once at process start.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMetaValidator;

impl SchemaMetaValidator {
    /// Construct the validator.
    pub fn new() -> Self {
        Self
    }

    /// Run the classification ladder over raw document text.
    ///
    /// On success returns the parsed document and its resolved dialect,
    /// which together make the document eligible for instance validation.
    pub fn check_text(&self, text: &str) -> Result<(Value, Dialect), MetaFailure> {
        let value: Value = serde_json::from_str(text).map_err(|e| MetaFailure::InvalidJson {
            detail: e.to_string(),
        })?;

        let uri = value
            .get("$schema")
            .and_then(Value::as_str)
            .ok_or(MetaFailure::MissingDialect)?;

        let dialect =
            Dialect::from_uri(uri).ok_or_else(|| MetaFailure::UnsupportedDialect {
                uri: uri.to_string(),
            })?;

        jsonschema::meta::validate(&value).map_err(|e| MetaFailure::InvalidStructure {
            detail: e.to_string(),
        })?;

        Ok((value, dialect))
    }

    /// Meta-validate one schema file.
    pub fn check_file(&self, path: &Path) -> Result<DocumentCheck, MetaError> {
        let text = fs::read_to_string(path).map_err(|source| MetaError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(DocumentCheck {
            file,
            outcome: self.check_text(&text).map(|(_, dialect)| dialect),
        })
    }

    /// Meta-validate every `*.json` document in a directory,
    /// lexicographically by filename.
    ///
    /// Classification failures land in the report; only environment
    /// problems (missing directory, empty corpus, unreadable file) are
    /// errors.
    pub fn check_dir(&self, dir: &Path) -> Result<MetaReport, MetaError> {
        if !dir.is_dir() {
            return Err(MetaError::MissingDir {
                dir: dir.to_path_buf(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|source| MetaError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| MetaError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

        if files.is_empty() {
            return Err(MetaError::EmptyDir {
                dir: dir.to_path_buf(),
            });
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            documents.push(self.check_file(file)?);
        }
        tracing::info!(documents = documents.len(), "meta-validated schema corpus");
        Ok(MetaReport { documents })
    }
}

/// Outcome of meta-validating a schema corpus.
#[derive(Debug, Clone)]
pub struct MetaReport {
    documents: Vec<DocumentCheck>,
}

impl MetaReport {
    /// Per-document outcomes in filename order.
    pub fn documents(&self) -> &[DocumentCheck] {
        &self.documents
    }

    /// True when every document is meta-valid.
    pub fn is_all_valid(&self) -> bool {
        self.documents.iter().all(|d| d.outcome.is_ok())
    }

    /// Render the stage receipt.
    ///
    /// Aggregate PASS carries the sorted list of validated filenames for
    /// traceability. Aggregate FAIL names the first failing document;
    /// every failure is still enumerated in the detail lines.
    pub fn receipt(&self) -> Receipt {
        let mut details = Vec::with_capacity(self.documents.len());
        let mut first_failure: Option<&DocumentCheck> = None;
        for doc in &self.documents {
            match &doc.outcome {
                Ok(_) => details.push(format!("ok {}", doc.file)),
                Err(failure) => {
                    details.push(format!("fail {} {failure}", doc.file));
                    if first_failure.is_none() {
                        first_failure = Some(doc);
                    }
                }
            }
        }

        let mut receipt = match first_failure.map(|doc| (&doc.file, doc.outcome.as_ref().err())) {
            Some((file, Some(failure))) => {
                Receipt::fail(format!("SCHEMA_CHECK_FAIL {file} {failure}"))
            }
            _ => {
                let names: Vec<&str> =
                    self.documents.iter().map(|d| d.file.as_str()).collect();
                Receipt::pass(format!("SCHEMA_CHECK_PASS {}", names.join(":")))
            }
        };
        for line in details {
            receipt.push_detail(line);
        }
        receipt
    }
}
