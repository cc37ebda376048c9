#![deny(missing_docs)]

//! # proofgate-core — Foundational Types for the Proofgate Pipeline
//!
//! This crate defines the types every gate stage depends on. It has no
//! internal crate dependencies — only `thiserror` from the external
//! ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Receipts are the only status channel.** A stage reports its outcome
//!    through a [`Receipt`]: ordered detail lines followed by exactly one
//!    terminal token. Stages share no in-memory state across invocations.
//!
//! 2. **Deterministic file selection.** [`FileSelector`] walks a tree with
//!    an extension allowlist, a dotfile allowlist, and an excluded-directory
//!    set, and always returns lexicographically sorted paths. Re-running a
//!    stage on an unchanged tree yields a byte-identical receipt.
//!
//! 3. **Two exit codes.** `0` means aggregate pass, `1` means aggregate
//!    fail or a precondition failure. The exit code is the sole
//!    machine-readable success signal; token text is for humans and logs.

pub mod receipt;
pub mod select;

pub use receipt::{Receipt, Verdict};
pub use select::{FileSelector, SelectError};
