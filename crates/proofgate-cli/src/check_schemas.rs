//! # check-schemas Subcommand
//!
//! Meta-validates every schema document under `<ROOT>/schemas`. The
//! schema corpus is a required dependency: a missing or empty directory
//! is a precondition failure, not a vacuous pass.

use std::path::{Path, PathBuf};

use clap::Args;

use anyhow::Result;
use proofgate_schema::meta::SchemaMetaValidator;

use crate::SCHEMAS_DIR;

/// Arguments for `proofgate check-schemas`.
#[derive(Args, Debug)]
pub struct CheckSchemasArgs {
    /// Repository root override; schemas are read from <ROOT>/schemas.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the check-schemas subcommand.
pub fn run_check_schemas(args: &CheckSchemasArgs, repo_root: &Path) -> Result<u8> {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| repo_root.to_path_buf());
    let schema_dir = root.join(SCHEMAS_DIR);

    match SchemaMetaValidator::new().check_dir(&schema_dir) {
        Ok(report) => {
            let receipt = report.receipt();
            println!("{receipt}");
            Ok(receipt.exit_code())
        }
        Err(e) => {
            // Environment failure: no per-document receipt is possible,
            // but the terminal token and reason still print.
            println!("SCHEMA_CHECK_FAIL {e}");
            Ok(1)
        }
    }
}
