use jsonschema::JSONSchema;

fn version_diff_schema() -> serde_json::Value {
    serde_json::json!({
      "$schema": "https://json-schema.org/draft/2020-12/schema",
      "$id": "cs://schemas/version-diff/v1",
      "type": "object",
      "required": ["prev_version", "cur_version", "edited_files"],
      "properties": {
        "prev_version": { "type": "integer", "minimum": 0 },
        "cur_version": { "type": "integer", "minimum": 0 },
        "edited_files": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["file_name", "is_deleted", "content_diff"],
            "properties": {
              "file_name": { "type": "string" },
              "is_deleted": { "type": "boolean" },
              "content_diff": {
                "type": "array",
                "items": {
                  "type": "object",
                  "required": ["op", "line", "content"],
                  "properties": {
                    "op": { "enum": ["del", "ins"] },
                    "line": { "type": "integer", "minimum": 0 },
                    "content": { "type": "array", "items": { "type": "string" } }
                  }
                }
              }
            }
          }
        }
      }
    })
}

fn history_log_schema() -> serde_json::Value {
    serde_json::json!({
      "$schema": "https://json-schema.org/draft/2020-12/schema",
      "$id": "cs://schemas/history-log/v1",
      "type": "object",
      "required": ["log"],
      "properties": {
        "log": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["version", "timestamp"],
            "properties": {
              "version": { "type": "integer", "minimum": 0 },
              "timestamp": { "type": "number" }
            }
          }
        }
      }
    })
}

#[test]
fn schema_version_diff_accepts_built_payload() {
    use cs_core::diff::calc_diff;
    use cs_core::wire::{FileDiff, VersionDiff};

    let base: Vec<String> = vec!["x".to_string(), "y".to_string()];
    let new: Vec<String> = vec!["z".to_string()];
    let vd = VersionDiff {
        prev_version: 0,
        cur_version: 1,
        edited_files: vec![
            FileDiff::edited("./a.ml", calc_diff(&base, &new)),
            FileDiff::deleted("./b.txt"),
        ],
    };
    let schema = JSONSchema::compile(&version_diff_schema()).expect("compile version diff schema");
    let payload = serde_json::to_value(&vd).expect("serialize version diff");
    assert!(schema.is_valid(&payload));
}

#[test]
fn schema_version_diff_rejects_unknown_op() {
    let schema = JSONSchema::compile(&version_diff_schema()).expect("compile version diff schema");
    let invalid = serde_json::json!({
      "prev_version": 0,
      "cur_version": 1,
      "edited_files": [{
        "file_name": "./a.ml",
        "is_deleted": false,
        "content_diff": [{ "op": "mov", "line": 1, "content": [] }]
      }]
    });
    assert!(!schema.is_valid(&invalid));
}

#[test]
fn schema_history_log_accepts_serialized_log() {
    use cs_core::wire::{HistoryEntry, HistoryLog};

    let log = HistoryLog {
        log: vec![
            HistoryEntry { version: 0, timestamp: 1700000000.0 },
            HistoryEntry { version: 1, timestamp: 1700000123.5 },
        ],
    };
    let schema = JSONSchema::compile(&history_log_schema()).expect("compile history log schema");
    let payload = serde_json::to_value(&log).expect("serialize history log");
    assert!(schema.is_valid(&payload));
}

#[test]
fn schema_history_log_rejects_missing_timestamp() {
    let schema = JSONSchema::compile(&history_log_schema()).expect("compile history log schema");
    let invalid = serde_json::json!({ "log": [{ "version": 0 }] });
    assert!(!schema.is_valid(&invalid));
}
