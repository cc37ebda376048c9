//! # unicode-guard Subcommand
//!
//! Leaf gate: scans the tree for hidden Unicode before anything else is
//! allowed to trust the bytes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use proofgate_scan::unicode::UnicodeScanner;

/// Arguments for `proofgate unicode-guard`.
#[derive(Args, Debug)]
pub struct UnicodeGuardArgs {
    /// Root directory to scan (default: the resolved repository root).
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the unicode-guard subcommand.
///
/// Returns exit code 0 on a clean tree, 1 on any violation.
pub fn run_unicode_guard(args: &UnicodeGuardArgs, repo_root: &Path) -> Result<u8> {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| repo_root.to_path_buf());

    let report = UnicodeScanner::default()
        .scan_tree(&root)
        .context("unicode scan failed")?;

    tracing::info!(files = report.files_scanned, "unicode guard finished");

    let receipt = report.receipt();
    println!("{receipt}");
    Ok(receipt.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_root_returns_zero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.json"), b"{}").unwrap();

        let args = UnicodeGuardArgs { root: None };
        assert_eq!(run_unicode_guard(&args, dir.path()).unwrap(), 0);
    }

    #[test]
    fn explicit_root_overrides_repo_root() {
        let repo = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        std::fs::write(other.path().join("bad.md"), "x\u{202E}y").unwrap();

        let args = UnicodeGuardArgs {
            root: Some(other.path().to_path_buf()),
        };
        assert_eq!(run_unicode_guard(&args, repo.path()).unwrap(), 1);
    }
}
