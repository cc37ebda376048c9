//! # InstanceValidator — Per-Line JSONL Validation
//!
//! Validates every non-blank line of a log artifact as a JSON object
//! against a schema already proven meta-valid. Every violation on a line
//! is collected (not just the first), each tagged with the JSON-pointer
//! path at which it occurred and a human-readable complaint.
//!
//! ## Trust Boundary
//!
//! The validator is compiled once from a schema that passed the
//! meta-validation ladder. [`InstanceValidator::load`] runs that ladder
//! itself, so there is no construction path that accepts an unproven
//! schema.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use proofgate_core::receipt::Receipt;

use crate::dialect::Dialect;
use crate::meta::{MetaFailure, SchemaMetaValidator};

/// One schema violation on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceViolation {
    /// JSON-pointer path from the document root; empty for the root.
    pub pointer: String,
    /// Human-readable complaint.
    pub message: String,
}

impl InstanceViolation {
    /// The pointer rendered for receipts, with the root spelled `(root)`.
    pub fn pointer_display(&self) -> &str {
        if self.pointer.is_empty() {
            "(root)"
        } else {
            &self.pointer
        }
    }
}

/// Outcome of validating one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank after trimming; skipped, not counted as a record.
    Blank,
    /// Parsed and conformed to the schema.
    Pass,
    /// The line is not valid JSON; validation did not proceed.
    ParseError {
        /// Parser complaint.
        detail: String,
    },
    /// The line parsed but violated the schema.
    Violations(Vec<InstanceViolation>),
}

/// Why a specific line failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFailureKind {
    /// Not valid JSON.
    Parse {
        /// Parser complaint.
        detail: String,
    },
    /// Schema violations, all of them.
    Violations(Vec<InstanceViolation>),
}

/// One failing line within an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based physical line number.
    pub line: usize,
    /// The failure.
    pub kind: LineFailureKind,
}

/// Outcome of validating one artifact.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// The artifact path as referenced by the caller.
    pub path: PathBuf,
    /// Count of non-blank lines validated.
    pub records: usize,
    /// Every failing line, in order.
    pub failures: Vec<LineFailure>,
}

impl FileOutcome {
    /// True when every record in the artifact passed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Error constructing the validator or reaching an artifact.
#[derive(Error, Debug)]
pub enum InstanceError {
    /// A referenced artifact or schema file could not be read. An
    /// explicitly referenced missing file is a caller error and fails
    /// hard, unlike an absent optional directory.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// The unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The schema failed meta-validation and may not be used for
    /// instance validation.
    #[error("schema {file} rejected: {failure}")]
    SchemaRejected {
        /// Schema path as given.
        file: String,
        /// The meta-validation classification.
        failure: MetaFailure,
    },

    /// The meta-valid schema could not be compiled to a validator.
    #[error("cannot compile schema {file}: {reason}")]
    SchemaCompile {
        /// Schema path as given.
        file: String,
        /// Compiler complaint.
        reason: String,
    },
}

/// Full instance validation against one proven schema.
#[derive(Debug)]
pub struct InstanceValidator {
    validator: jsonschema::Validator,
    schema_name: String,
}

impl InstanceValidator {
    /// Compile a validator from a document already proven meta-valid,
    /// under the dialect meta-validation resolved for it.
    pub fn from_meta_valid(
        name: &str,
        schema: &Value,
        dialect: Dialect,
    ) -> Result<Self, InstanceError> {
        let validator = jsonschema::options()
            .with_draft(dialect.draft())
            .build(schema)
            .map_err(|e| InstanceError::SchemaCompile {
                file: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            validator,
            schema_name: name.to_string(),
        })
    }

    /// Load a schema file, run the meta-validation ladder on it, and
    /// compile it. The only way to build a validator from disk.
    pub fn load(path: &Path) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path).map_err(|source| InstanceError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path.display().to_string();
        let (value, dialect) =
            SchemaMetaValidator::new()
                .check_text(&text)
                .map_err(|failure| InstanceError::SchemaRejected {
                    file: name.clone(),
                    failure,
                })?;
        tracing::debug!(schema = %name, dialect = %dialect, "compiled instance validator");
        Self::from_meta_valid(&name, &value, dialect)
    }

    /// The schema this validator was compiled from.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Validate one raw line.
    pub fn validate_line(&self, line: &str) -> LineOutcome {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineOutcome::Blank;
        }
        let instance: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                return LineOutcome::ParseError {
                    detail: e.to_string(),
                }
            }
        };
        let violations: Vec<InstanceViolation> = self
            .validator
            .iter_errors(&instance)
            .map(|err| InstanceViolation {
                pointer: err.instance_path.to_string(),
                message: err.to_string(),
            })
            .collect();
        if violations.is_empty() {
            LineOutcome::Pass
        } else {
            LineOutcome::Violations(violations)
        }
    }

    /// Validate one artifact line-by-line.
    ///
    /// Blank lines are skipped and do not count as records; line numbers
    /// stay physical. A missing artifact is a hard failure.
    pub fn validate_file(&self, path: &Path) -> Result<FileOutcome, InstanceError> {
        let text = fs::read_to_string(path).map_err(|source| InstanceError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = 0usize;
        let mut failures = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            match self.validate_line(line) {
                LineOutcome::Blank => {}
                LineOutcome::Pass => records += 1,
                LineOutcome::ParseError { detail } => {
                    records += 1;
                    failures.push(LineFailure {
                        line: idx + 1,
                        kind: LineFailureKind::Parse { detail },
                    });
                }
                LineOutcome::Violations(violations) => {
                    records += 1;
                    failures.push(LineFailure {
                        line: idx + 1,
                        kind: LineFailureKind::Violations(violations),
                    });
                }
            }
        }
        Ok(FileOutcome {
            path: path.to_path_buf(),
            records,
            failures,
        })
    }

    /// Validate a set of artifacts in the order given.
    pub fn validate_files<P: AsRef<Path>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<InstanceReport, InstanceError> {
        let mut files = Vec::new();
        for path in paths {
            files.push(self.validate_file(path.as_ref())?);
        }
        Ok(InstanceReport { files })
    }
}

/// Outcome of validating one or more artifacts.
#[derive(Debug, Clone)]
pub struct InstanceReport {
    files: Vec<FileOutcome>,
}

impl InstanceReport {
    /// Per-artifact outcomes.
    pub fn files(&self) -> &[FileOutcome] {
        &self.files
    }

    /// True when every line in every artifact passed. Zero artifacts is
    /// vacuously clean.
    pub fn is_all_valid(&self) -> bool {
        self.files.iter().all(FileOutcome::is_clean)
    }

    /// Total records validated across all artifacts.
    pub fn records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    /// Render the stage receipt.
    ///
    /// One detail line per clean artifact; one detail line per violation
    /// (or parse failure), carrying the file, line, complaint, and
    /// JSON-pointer path. An empty artifact set is a vacuous PASS.
    pub fn receipt(&self) -> Receipt {
        let mut details = Vec::new();
        if self.files.is_empty() {
            details.push("no artifacts to validate".to_string());
        }
        for file in &self.files {
            if file.is_clean() {
                details.push(format!(
                    "JSONL_SCHEMA_VALIDATE_PASS {}",
                    file.path.display()
                ));
                continue;
            }
            for failure in &file.failures {
                match &failure.kind {
                    LineFailureKind::Parse { detail } => details.push(format!(
                        "JSONL_SCHEMA_VALIDATE_FAIL {}:{} :: PARSE_ERROR: {} @ (root)",
                        file.path.display(),
                        failure.line,
                        detail
                    )),
                    LineFailureKind::Violations(violations) => {
                        for violation in violations {
                            details.push(format!(
                                "JSONL_SCHEMA_VALIDATE_FAIL {}:{} :: {} @ {}",
                                file.path.display(),
                                failure.line,
                                violation.message,
                                violation.pointer_display()
                            ));
                        }
                    }
                }
            }
        }

        let mut receipt = if self.is_all_valid() {
            Receipt::pass("JSONL_SCHEMA_VALIDATE_PASS")
        } else {
            Receipt::fail("JSONL_SCHEMA_VALIDATE_FAIL")
        };
        for line in details {
            receipt.push_detail(line);
        }
        receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT7: &str = "http://json-schema.org/draft-07/schema#";

    fn number_schema() -> String {
        format!(
            r#"{{"$schema": "{DRAFT7}",
                "type": "object",
                "required": ["a"],
                "properties": {{"a": {{"type": "number"}}}}}}"#
        )
    }

    fn validator_for(schema_text: &str) -> InstanceValidator {
        let (value, dialect) = SchemaMetaValidator::new().check_text(schema_text).unwrap();
        InstanceValidator::from_meta_valid("test.schema.json", &value, dialect).unwrap()
    }

    #[test]
    fn completeness_over_the_four_line_example() {
        // Line 1 passes, line 2 is a type mismatch at /a, line 3 is
        // skipped, line 4 is missing the required property.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{\"a\":1}\n{\"a\":\"x\"}\n\n{}\n").unwrap();

        let outcome = validator_for(&number_schema()).validate_file(&path).unwrap();
        assert_eq!(outcome.records, 3, "blank line must not count as a record");
        assert_eq!(outcome.failures.len(), 2);

        assert_eq!(outcome.failures[0].line, 2);
        match &outcome.failures[0].kind {
            LineFailureKind::Violations(v) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].pointer, "/a");
            }
            other => panic!("expected violations, got {other:?}"),
        }

        assert_eq!(outcome.failures[1].line, 4);
        match &outcome.failures[1].kind {
            LineFailureKind::Violations(v) => {
                assert!(v[0].message.contains('a'), "message: {}", v[0].message);
                assert_eq!(v[0].pointer_display(), "(root)");
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn every_violation_on_a_line_is_collected() {
        let schema = format!(
            r#"{{"$schema": "{DRAFT7}",
                "type": "object",
                "required": ["a", "b"],
                "properties": {{
                    "a": {{"type": "number"}},
                    "b": {{"type": "string"}}
                }}}}"#
        );
        let outcome = validator_for(&schema).validate_line(r#"{"a": "wrong", "c": 1}"#);
        match outcome {
            LineOutcome::Violations(v) => {
                assert!(
                    v.len() >= 2,
                    "expected type mismatch plus missing-required, got {v:?}"
                );
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_line_is_a_parse_error_and_validation_stops_for_it() {
        let outcome = validator_for(&number_schema()).validate_line("{oops");
        assert!(matches!(outcome, LineOutcome::ParseError { .. }));
    }

    #[test]
    fn parse_error_on_one_line_does_not_stop_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.jsonl");
        std::fs::write(&path, "{oops\n{\"a\":2}\n").unwrap();

        let outcome = validator_for(&number_schema()).validate_file(&path).unwrap();
        assert_eq!(outcome.records, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].line, 1);
    }

    #[test]
    fn empty_artifact_is_vacuously_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "\n\n").unwrap();

        let outcome = validator_for(&number_schema()).validate_file(&path).unwrap();
        assert_eq!(outcome.records, 0);
        assert!(outcome.is_clean());
    }

    #[test]
    fn missing_artifact_is_a_hard_fail() {
        let err = validator_for(&number_schema())
            .validate_file(Path::new("/tmp/proofgate-no-such-artifact.jsonl"))
            .unwrap_err();
        assert!(matches!(err, InstanceError::ReadFile { .. }));
    }

    #[test]
    fn zero_artifacts_is_a_vacuous_aggregate_pass() {
        let report = validator_for(&number_schema())
            .validate_files(Vec::<PathBuf>::new())
            .unwrap();
        let receipt = report.receipt();
        assert_eq!(receipt.token(), "JSONL_SCHEMA_VALIDATE_PASS");
        assert_eq!(receipt.details(), ["no artifacts to validate"]);
        assert_eq!(receipt.exit_code(), 0);
    }

    #[test]
    fn load_rejects_a_schema_that_fails_meta_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.schema.json");
        std::fs::write(&path, r#"{"type": "object"}"#).unwrap();

        let err = InstanceValidator::load(&path).unwrap_err();
        match err {
            InstanceError::SchemaRejected { failure, .. } => {
                assert_eq!(failure, MetaFailure::MissingDialect);
            }
            other => panic!("expected SchemaRejected, got {other}"),
        }
    }

    #[test]
    fn load_accepts_and_compiles_a_meta_valid_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.schema.json");
        std::fs::write(&path, number_schema()).unwrap();

        let validator = InstanceValidator::load(&path).unwrap();
        assert_eq!(validator.validate_line(r#"{"a": 3}"#), LineOutcome::Pass);
    }

    #[test]
    fn fail_receipt_carries_message_and_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{\"a\":\"x\"}\n").unwrap();

        let report = validator_for(&number_schema())
            .validate_files([&path])
            .unwrap();
        let receipt = report.receipt();
        assert_eq!(receipt.token(), "JSONL_SCHEMA_VALIDATE_FAIL");
        let rendered = receipt.render();
        assert!(rendered.contains(":1 :: "), "rendered: {rendered}");
        assert!(rendered.contains("@ /a"), "rendered: {rendered}");
    }

    #[test]
    fn clean_artifact_gets_a_per_file_pass_detail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{\"a\": 1}\n{\"a\": 2.5}\n").unwrap();

        let report = validator_for(&number_schema())
            .validate_files([&path])
            .unwrap();
        assert!(report.is_all_valid());
        assert_eq!(report.records(), 2);
        let receipt = report.receipt();
        assert_eq!(receipt.details().len(), 1);
        assert!(receipt.details()[0].starts_with("JSONL_SCHEMA_VALIDATE_PASS "));
    }
}
