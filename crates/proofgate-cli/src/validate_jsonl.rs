//! # validate-jsonl Subcommand
//!
//! Instance-validates JSONL artifacts against the conventional event
//! schema (or an explicit `--schema` override). The schema is
//! meta-validated before use; a rejected schema never validates
//! anything.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use proofgate_schema::instance::InstanceValidator;

use crate::{list_proof_artifacts, resolve_path, DEFAULT_SCHEMA, PROOFS_DIR};

/// Arguments for `proofgate validate-jsonl`.
#[derive(Args, Debug)]
pub struct ValidateJsonlArgs {
    /// Schema to validate against (default: the conventional event
    /// schema under schemas/).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// JSONL artifacts to validate (default: every *.jsonl under
    /// proofs/). A named file that does not exist is a hard failure.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

/// Execute the validate-jsonl subcommand.
pub fn run_validate_jsonl(args: &ValidateJsonlArgs, repo_root: &Path) -> Result<u8> {
    let schema_path = args
        .schema
        .clone()
        .map(|p| resolve_path(&p, repo_root))
        .unwrap_or_else(|| repo_root.join(DEFAULT_SCHEMA));

    let validator = match InstanceValidator::load(&schema_path) {
        Ok(v) => v,
        Err(e) => {
            println!("{e}");
            println!("JSONL_SCHEMA_VALIDATE_FAIL");
            return Ok(1);
        }
    };

    let files: Vec<PathBuf> = if args.files.is_empty() {
        list_proof_artifacts(&repo_root.join(PROOFS_DIR))?
    } else {
        args.files
            .iter()
            .map(|p| resolve_path(p, repo_root))
            .collect()
    };

    tracing::info!(
        schema = validator.schema_name(),
        artifacts = files.len(),
        "instance validation starting"
    );

    match validator.validate_files(&files) {
        Ok(report) => {
            let receipt = report.receipt();
            println!("{receipt}");
            Ok(receipt.exit_code())
        }
        Err(e) => {
            println!("{e}");
            println!("JSONL_SCHEMA_VALIDATE_FAIL");
            Ok(1)
        }
    }
}
