//! Cross-stage pipeline flows: fail-closed ordering, hard-stop
//! semantics, and vacuous passes over a journal-produced corpus.

use std::fs;
use std::path::Path;

use serde_json::json;

use proofgate_cli::gate::run_stages;
use proofgate_cli::{DEFAULT_SCHEMA, PROOFS_DIR, SCHEMAS_DIR};
use proofgate_journal::Journal;

const EVENT_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Agent event record",
  "type": "object",
  "required": ["event_type", "timestamp"],
  "properties": {
    "event_type": {"type": "string", "minLength": 1},
    "timestamp": {"type": "string"},
    "agent_id": {"type": "string"},
    "payload": {"type": "object"}
  }
}"#;

fn write_event_schema(root: &Path) {
    fs::create_dir_all(root.join(SCHEMAS_DIR)).unwrap();
    fs::write(root.join(DEFAULT_SCHEMA), EVENT_SCHEMA).unwrap();
}

fn write_proofs(root: &Path) {
    fs::create_dir_all(root.join(PROOFS_DIR)).unwrap();
    let mut journal = Journal::open(root.join(PROOFS_DIR).join("run-001.jsonl")).unwrap();
    journal
        .append(&json!({
            "event_type": "agent.start",
            "timestamp": "2026-08-05T12:00:00Z",
            "agent_id": "agent-7"
        }))
        .unwrap();
    journal
        .append(&json!({
            "event_type": "agent.step",
            "timestamp": "2026-08-05T12:00:01Z",
            "payload": {"seq": 1}
        }))
        .unwrap();
}

#[test]
fn clean_corpus_passes_all_four_stages() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    write_proofs(dir.path());

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 4, "all four stages must run");
    assert!(receipts.iter().all(|r| r.is_pass()));
    assert_eq!(receipts[0].token(), "UNICODE_GUARD_PASS");
    assert_eq!(receipts[1].token(), "PII_SCAN_PASS");
    assert!(receipts[2].token().starts_with("SCHEMA_CHECK_PASS"));
    assert_eq!(receipts[3].token(), "JSONL_SCHEMA_VALIDATE_PASS");
}

#[test]
fn zero_width_in_a_schema_file_stops_the_pipeline_at_stage_one() {
    // Fail-closed ordering: the schema file is valid JSON, but the
    // hidden character means SchemaMetaValidator must never see it.
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    write_proofs(dir.path());
    fs::write(
        dir.path().join(SCHEMAS_DIR).join("sneaky.schema.json"),
        "{\"$schema\": \"http://json-schema.org/draft-07/schema#\", \"title\": \"a\u{200B}b\"}",
    )
    .unwrap();

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 1, "later stages must not run");
    assert!(receipts[0]
        .token()
        .starts_with("UNICODE_GUARD_FAIL"));
    assert!(receipts[0].render().contains("sneaky.schema.json"));
}

#[test]
fn pii_in_proofs_stops_the_pipeline_before_schema_checks() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    fs::create_dir_all(dir.path().join(PROOFS_DIR)).unwrap();
    fs::write(
        dir.path().join(PROOFS_DIR).join("leak.jsonl"),
        "{\"event_type\":\"agent.note\",\"timestamp\":\"2026-08-05T12:00:00Z\",\"note\":\"mail me at eve@leak.example.net\"}\n",
    )
    .unwrap();

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 2);
    assert!(receipts[0].is_pass());
    assert!(receipts[1].token().starts_with("PII_VIOLATIONS_FOUND"));
}

#[test]
fn structurally_invalid_schema_stops_before_instance_validation() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    write_proofs(dir.path());
    fs::write(
        dir.path().join(SCHEMAS_DIR).join("broken.schema.json"),
        "{\"$schema\": \"http://json-schema.org/draft-07/schema#\", \"required\": \"foo\"}",
    )
    .unwrap();

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 3);
    assert!(receipts[2]
        .token()
        .starts_with("SCHEMA_CHECK_FAIL broken.schema.json INVALID_SCHEMA_STRUCTURE"));
}

#[test]
fn nonconforming_record_fails_the_final_stage() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    fs::create_dir_all(dir.path().join(PROOFS_DIR)).unwrap();
    fs::write(
        dir.path().join(PROOFS_DIR).join("bad.jsonl"),
        "{\"event_type\":\"agent.start\",\"timestamp\":\"2026-08-05T12:00:00Z\"}\n{\"event_type\":42}\n",
    )
    .unwrap();

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 4);
    assert_eq!(receipts[3].token(), "JSONL_SCHEMA_VALIDATE_FAIL");
    assert!(receipts[3].render().contains(":2 :: "));
}

#[test]
fn absent_proofs_directory_is_a_vacuous_pass() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 4);
    assert!(receipts.iter().all(|r| r.is_pass()));
    assert_eq!(
        receipts[3].details(),
        ["no artifacts to validate"],
        "zero artifacts, not a failure"
    );
}

#[test]
fn missing_schema_corpus_fails_stage_three() {
    let dir = tempfile::tempdir().unwrap();
    write_proofs(dir.path());

    let receipts = run_stages(dir.path()).unwrap();
    assert_eq!(receipts.len(), 3);
    assert!(receipts[2].token().starts_with("SCHEMA_CHECK_FAIL"));
}

#[test]
fn rerunning_the_pipeline_yields_identical_receipts() {
    let dir = tempfile::tempdir().unwrap();
    write_event_schema(dir.path());
    write_proofs(dir.path());

    let first: Vec<String> = run_stages(dir.path())
        .unwrap()
        .iter()
        .map(|r| r.render())
        .collect();
    let second: Vec<String> = run_stages(dir.path())
        .unwrap()
        .iter()
        .map(|r| r.render())
        .collect();
    assert_eq!(first, second);
}
