//! # pii-scan Subcommand
//!
//! Scans log artifacts for personally identifiable information, with
//! allowlisted exceptions loaded from the repository's regex file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use proofgate_scan::pii::{Allowlist, PiiPatterns, PiiScanner};

use crate::{ALLOWLIST_FILE, PROOFS_DIR};

/// Arguments for `proofgate pii-scan`.
#[derive(Args, Debug)]
pub struct PiiScanArgs {
    /// Directory of log artifacts (default: proofs/ under the repo root).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Allowlist file of exempt regex patterns (default:
    /// pii_allowlist.regex at the repo root; missing means no exemptions).
    #[arg(long, value_name = "PATH")]
    pub allowlist: Option<PathBuf>,
}

/// Execute the pii-scan subcommand.
pub fn run_pii_scan(args: &PiiScanArgs, repo_root: &Path) -> Result<u8> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| repo_root.join(PROOFS_DIR));
    let allowlist_path = args
        .allowlist
        .clone()
        .unwrap_or_else(|| repo_root.join(ALLOWLIST_FILE));

    let patterns = PiiPatterns::standard().context("failed to compile PII patterns")?;
    let allowlist = Allowlist::load(&allowlist_path).context("failed to load PII allowlist")?;
    tracing::info!(entries = allowlist.len(), "loaded PII allowlist");

    let report = PiiScanner::new(patterns, allowlist)
        .scan_dir(&dir)
        .context("pii scan failed")?;

    let receipt = report.receipt();
    println!("{receipt}");
    Ok(receipt.exit_code())
}
