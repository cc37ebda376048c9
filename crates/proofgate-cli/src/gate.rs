//! # gate Subcommand — The Composed Pipeline
//!
//! Runs the four stages in the fixed order with hard-stop semantics: a
//! failing stage's receipt is emitted and later stages never run. This
//! is the fail-closed composition that makes the per-stage trust
//! assumptions hold: SchemaMetaValidator only ever sees schema files
//! that UnicodeGuard cleared, and InstanceValidator only ever uses a
//! schema proven meta-valid.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use proofgate_core::receipt::Receipt;
use proofgate_scan::pii::{Allowlist, PiiPatterns, PiiScanner};
use proofgate_scan::unicode::UnicodeScanner;
use proofgate_schema::instance::InstanceValidator;
use proofgate_schema::meta::SchemaMetaValidator;

use crate::{list_proof_artifacts, ALLOWLIST_FILE, DEFAULT_SCHEMA, PROOFS_DIR, SCHEMAS_DIR};

/// Arguments for `proofgate gate`.
#[derive(Args, Debug)]
pub struct GateArgs {
    /// Repository root to gate (default: the resolved repository root).
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the gate subcommand.
///
/// Prints each stage receipt as it completes. The exit code is that of
/// the last stage run: 0 only when all four passed.
pub fn run_gate(args: &GateArgs, repo_root: &Path) -> Result<u8> {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| repo_root.to_path_buf());

    let receipts = run_stages(&root)?;
    let mut code = 1;
    for receipt in &receipts {
        println!("{receipt}");
        code = receipt.exit_code();
    }
    Ok(code)
}

/// Run the pipeline stages in order, stopping at the first failure.
///
/// Returns the receipts of every stage that ran. Four receipts with the
/// last passing means the corpus is accepted; fewer receipts means the
/// last one is the failure that stopped the pipeline.
pub fn run_stages(root: &Path) -> Result<Vec<Receipt>> {
    let mut receipts = Vec::with_capacity(4);

    // Stage 1: UnicodeGuard over the full tree, schemas included.
    let receipt = UnicodeScanner::default()
        .scan_tree(root)
        .context("unicode scan failed")?
        .receipt();
    if push_and_stop(&mut receipts, receipt) {
        return Ok(receipts);
    }

    // Stage 2: PIIScanner over the proof artifacts.
    let patterns = PiiPatterns::standard().context("failed to compile PII patterns")?;
    let allowlist =
        Allowlist::load(&root.join(ALLOWLIST_FILE)).context("failed to load PII allowlist")?;
    let receipt = PiiScanner::new(patterns, allowlist)
        .scan_dir(&root.join(PROOFS_DIR))
        .context("pii scan failed")?
        .receipt();
    if push_and_stop(&mut receipts, receipt) {
        return Ok(receipts);
    }

    // Stage 3: SchemaMetaValidator over the (now trusted) schema bytes.
    let receipt = match SchemaMetaValidator::new().check_dir(&root.join(SCHEMAS_DIR)) {
        Ok(report) => report.receipt(),
        Err(e) => Receipt::fail(format!("SCHEMA_CHECK_FAIL {e}")),
    };
    if push_and_stop(&mut receipts, receipt) {
        return Ok(receipts);
    }

    // Stage 4: InstanceValidator with the conventional schema.
    let receipt = match InstanceValidator::load(&root.join(DEFAULT_SCHEMA)) {
        Ok(validator) => {
            let artifacts = list_proof_artifacts(&root.join(PROOFS_DIR))
                .context("failed to list proof artifacts")?;
            match validator.validate_files(&artifacts) {
                Ok(report) => report.receipt(),
                Err(e) => Receipt::fail("JSONL_SCHEMA_VALIDATE_FAIL").with_detail(e.to_string()),
            }
        }
        Err(e) => Receipt::fail("JSONL_SCHEMA_VALIDATE_FAIL").with_detail(e.to_string()),
    };
    receipts.push(receipt);
    Ok(receipts)
}

/// Record a stage receipt; true means the pipeline must stop here.
fn push_and_stop(receipts: &mut Vec<Receipt>, receipt: Receipt) -> bool {
    let stop = !receipt.is_pass();
    receipts.push(receipt);
    stop
}
