use crate::app_error::{AppError, AppResult};
use crate::canon_json::to_canonical_bytes;
use crate::diff::{Diff, Operation};
use serde::{Deserialize, Serialize};

/// On-the-wire shape of one diff operation. `del` carries a single empty
/// string as `content`, a placeholder kept for compatibility with older
/// payloads; consumers ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationWire {
    pub op: String,
    pub line: usize,
    #[serde(default)]
    pub content: Vec<String>,
}

impl From<Operation> for OperationWire {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Delete { line } => Self {
                op: "del".to_string(),
                line,
                content: vec![String::new()],
            },
            Operation::Insert { line, content } => Self {
                op: "ins".to_string(),
                line,
                content,
            },
        }
    }
}

impl TryFrom<OperationWire> for Operation {
    type Error = String;

    fn try_from(wire: OperationWire) -> Result<Self, String> {
        match wire.op.as_str() {
            "del" => Ok(Operation::Delete { line: wire.line }),
            "ins" => Ok(Operation::Insert {
                line: wire.line,
                content: wire.content,
            }),
            other => Err(format!("unknown diff op `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDiff {
    pub file_name: String,
    pub is_deleted: bool,
    pub content_diff: Diff,
}

impl FileDiff {
    pub fn edited(file_name: &str, content_diff: Diff) -> Self {
        Self {
            file_name: file_name.to_string(),
            is_deleted: false,
            content_diff,
        }
    }

    pub fn deleted(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            is_deleted: true,
            content_diff: Diff::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDiff {
    pub prev_version: u64,
    pub cur_version: u64,
    pub edited_files: Vec<FileDiff>,
}

impl VersionDiff {
    pub fn identity(version: u64) -> Self {
        Self {
            prev_version: version,
            cur_version: version,
            edited_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionResp {
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub version: u64,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    pub log: Vec<HistoryEntry>,
}

pub fn parse_version_diff(bytes: &[u8]) -> AppResult<VersionDiff> {
    serde_json::from_slice(bytes).map_err(|e| {
        AppError::malformed_diff(
            "failed parsing version diff",
            serde_json::json!({ "error": e.to_string() }),
        )
    })
}

/// Canonical (sorted-key) bytes for a version diff, used wherever a diff is
/// persisted so stored artifacts are byte-stable.
pub fn build_version_diff(vd: &VersionDiff) -> AppResult<Vec<u8>> {
    let value = serde_json::to_value(vd).map_err(|e| {
        AppError::malformed_diff(
            "failed serializing version diff",
            serde_json::json!({ "error": e.to_string() }),
        )
    })?;
    to_canonical_bytes(&value)
}
