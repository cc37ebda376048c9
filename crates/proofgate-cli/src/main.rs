//! # proofgate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Exit code is the sole machine-readable success signal: 0 for
//! aggregate pass, 1 for aggregate fail or a precondition failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use proofgate_cli::check_schemas::{run_check_schemas, CheckSchemasArgs};
use proofgate_cli::gate::{run_gate, GateArgs};
use proofgate_cli::pii_scan::{run_pii_scan, PiiScanArgs};
use proofgate_cli::unicode_guard::{run_unicode_guard, UnicodeGuardArgs};
use proofgate_cli::validate_jsonl::{run_validate_jsonl, ValidateJsonlArgs};

/// Proofgate — fail-closed validation gates for agent-event logs.
///
/// Four ordered gates decide whether proof artifacts enter the trusted
/// corpus: hidden-Unicode detection, PII scanning, schema
/// meta-validation, and JSONL instance validation.
#[derive(Parser, Debug)]
#[command(name = "proofgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan text artifacts for hidden or obfuscating Unicode.
    UnicodeGuard(UnicodeGuardArgs),

    /// Scan log artifacts for PII, modulated by the regex allowlist.
    PiiScan(PiiScanArgs),

    /// Verify each schema document is itself a valid JSON Schema.
    CheckSchemas(CheckSchemasArgs),

    /// Validate JSONL artifacts against a proven schema.
    ValidateJsonl(ValidateJsonlArgs),

    /// Run all four gates in order with hard-stop semantics.
    Gate(GateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Resolve the repository root: walk up from CWD looking for `schemas/`.
    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::warn!("could not locate repository root; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = match cli.command {
        Commands::UnicodeGuard(args) => run_unicode_guard(&args, &repo_root),
        Commands::PiiScan(args) => run_pii_scan(&args, &repo_root),
        Commands::CheckSchemas(args) => run_check_schemas(&args, &repo_root),
        Commands::ValidateJsonl(args) => run_validate_jsonl(&args, &repo_root),
        Commands::Gate(args) => run_gate(&args, &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Walk up from the current directory to find the repository root,
/// identified by the presence of a `schemas/` directory.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join("schemas").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
