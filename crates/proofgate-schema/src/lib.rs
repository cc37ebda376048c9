//! # proofgate-schema — Schema Gates
//!
//! The two schema-aware gates of the proofgate pipeline, plus the dialect
//! capability table they share.
//!
//! - [`dialect`] — maps supported `$schema` URIs to validator drafts. An
//!   unrecognized URI is a typed classification, never a silent fallback.
//! - [`meta`] — SchemaMetaValidator. Proves each schema document is
//!   syntactically valid JSON and is itself a structurally valid JSON
//!   Schema under the dialect it declares.
//! - [`instance`] — InstanceValidator. Validates every non-blank JSONL
//!   line against a schema already proven meta-valid, collecting every
//!   violation per line with its JSON-pointer path.
//!
//! ## Ordering Invariant
//!
//! These gates trust their input bytes. They must only run against
//! artifacts that UnicodeGuard (and, for log artifacts, PIIScanner) have
//! already cleared; the invoking harness enforces that order.

pub mod dialect;
pub mod instance;
pub mod meta;

pub use dialect::Dialect;
pub use instance::{
    FileOutcome, InstanceError, InstanceReport, InstanceValidator, InstanceViolation, LineFailure,
    LineFailureKind, LineOutcome,
};
pub use meta::{DocumentCheck, MetaError, MetaFailure, MetaReport, SchemaMetaValidator};
