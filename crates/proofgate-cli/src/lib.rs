//! # proofgate-cli — The Invoking Harness
//!
//! Provides the `proofgate` command-line interface. Each gate stage is an
//! independent entry point printing its receipt to stdout and exiting 0
//! on aggregate pass or 1 on aggregate fail; `proofgate gate` composes
//! all four in the fixed order with hard-stop semantics.
//!
//! ## Subcommands
//!
//! - `proofgate unicode-guard [ROOT]` — hidden-Unicode scan of the tree.
//! - `proofgate pii-scan [DIR] [--allowlist PATH]` — PII scan of log
//!   artifacts.
//! - `proofgate check-schemas [ROOT]` — schema-of-schemas validation of
//!   `<ROOT>/schemas`.
//! - `proofgate validate-jsonl [FILES]... [--schema PATH]` — instance
//!   validation of JSONL artifacts.
//! - `proofgate gate [ROOT]` — the composed pipeline.

pub mod check_schemas;
pub mod gate;
pub mod pii_scan;
pub mod unicode_guard;
pub mod validate_jsonl;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory of schema documents, relative to the repository root.
pub const SCHEMAS_DIR: &str = "schemas";

/// Directory of proof artifacts, relative to the repository root.
pub const PROOFS_DIR: &str = "proofs";

/// The PII allowlist file, relative to the repository root.
pub const ALLOWLIST_FILE: &str = "pii_allowlist.regex";

/// The conventional event schema, relative to the repository root.
pub const DEFAULT_SCHEMA: &str = "schemas/agent_event.v1.schema.json";

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths pass through. A relative path that exists under
/// `repo_root` resolves there; otherwise it stays relative to the
/// current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Collect every `*.jsonl` artifact in a directory, sorted.
///
/// A missing directory yields an empty list: an absent proofs directory
/// means nothing to validate, distinct from an explicitly referenced
/// missing file.
pub fn list_proof_artifacts(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut artifacts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            artifacts.push(path);
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_prefers_repo_relative_when_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exists.json"), b"{}").unwrap();

        let resolved = resolve_path(Path::new("exists.json"), dir.path());
        assert_eq!(resolved, dir.path().join("exists.json"));

        let missing = resolve_path(Path::new("missing.json"), dir.path());
        assert_eq!(missing, PathBuf::from("missing.json"));
    }

    #[test]
    fn list_proof_artifacts_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jsonl"), b"").unwrap();
        std::fs::write(dir.path().join("a.jsonl"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();

        let artifacts = list_proof_artifacts(dir.path()).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts[0].ends_with("a.jsonl"));
        assert!(artifacts[1].ends_with("b.jsonl"));
    }

    #[test]
    fn list_proof_artifacts_missing_dir_is_empty() {
        let artifacts =
            list_proof_artifacts(Path::new("/tmp/proofgate-no-such-proofs-dir")).unwrap();
        assert!(artifacts.is_empty());
    }
}
