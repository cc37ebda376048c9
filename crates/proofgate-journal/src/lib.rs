#![deny(missing_docs)]

//! # proofgate-journal — Append-Only Event Journal
//!
//! A deterministic JSONL writer for agent events. One record per line,
//! UTF-8, lexicographically sorted keys, compact separators, flushed
//! after every write.
//!
//! The journal performs no validation. Acceptance of its output into a
//! trusted corpus is decided entirely by the downstream gate pipeline;
//! the writer's only obligation is deterministic framing, so that the
//! same events always produce byte-identical artifacts.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error writing to or reading from a journal.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Filesystem failure on the journal file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The event could not be encoded as JSON.
    #[error("event is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only JSONL logger with an in-memory event buffer.
///
/// With a path, every appended event is encoded canonically and flushed
/// to disk immediately; without one, events accumulate in memory only.
#[derive(Debug)]
pub struct Journal {
    path: Option<PathBuf>,
    file: Option<File>,
    events: Vec<Value>,
}

impl Journal {
    /// A journal that buffers events in memory without a file sink.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            file: None,
            events: Vec::new(),
        }
    }

    /// Open a journal that appends to the file at `path`, creating it if
    /// absent. Existing records are left untouched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path: Some(path),
            file: Some(file),
            events: Vec::new(),
        })
    }

    /// Append one event.
    ///
    /// The event is encoded as a single line with sorted keys and compact
    /// separators, written, and flushed before this method returns, so a
    /// crash never leaves a partially written record visible to readers
    /// that tolerate only a truncated final line.
    pub fn append(&mut self, event: &impl Serialize) -> Result<(), JournalError> {
        let value = serde_json::to_value(event)?;
        if let Some(file) = &mut self.file {
            let line = canonical_line(&value)?;
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
        }
        self.events.push(value);
        Ok(())
    }

    /// Events appended through this journal instance, in order.
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// The journal file path, if this journal has a file sink.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read every record from a JSONL file, skipping blank lines.
    pub fn read(path: impl AsRef<Path>) -> Result<Vec<Value>, JournalError> {
        let text = std::fs::read_to_string(path)?;
        let mut events = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            events.push(serde_json::from_str(line)?);
        }
        Ok(events)
    }
}

/// Encode one record with lexicographically sorted keys and compact
/// separators. Key order is enforced by rebuilding every object, so the
/// encoding does not depend on `serde_json` feature flags.
fn canonical_line(value: &Value) -> Result<String, JournalError> {
    Ok(serde_json::to_string(&sort_keys(value))?)
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| k.as_str());
            let mut sorted = Map::new();
            for (k, v) in pairs {
                sorted.insert(k.clone(), sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
