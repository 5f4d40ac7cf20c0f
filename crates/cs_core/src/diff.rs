use crate::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One edit against a 1-indexed base sequence of lines. `Insert` with
/// `line = 0` places its content at the very front of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "crate::wire::OperationWire",
    into = "crate::wire::OperationWire"
)]
pub enum Operation {
    Delete { line: usize },
    Insert { line: usize, content: Vec<String> },
}

impl Operation {
    pub fn line(&self) -> usize {
        match self {
            Operation::Delete { line } => *line,
            Operation::Insert { line, .. } => *line,
        }
    }
}

/// Ordered list of operations over a single base sequence. The empty diff
/// is the identity and compares equal by value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff {
    ops: Vec<Operation>,
}

impl Diff {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn empty() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }
}

fn diff_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::malformed_diff(message, details)
}

/// Canonical producer: delete every base line, then insert the new content
/// at the front. Equal inputs produce the empty diff.
pub fn calc_diff(base: &[String], new: &[String]) -> Diff {
    if base == new {
        return Diff::empty();
    }
    let mut ops: Vec<Operation> = (1..=base.len())
        .map(|line| Operation::Delete { line })
        .collect();
    if !new.is_empty() {
        ops.push(Operation::Insert {
            line: 0,
            content: new.to_vec(),
        });
    }
    Diff::new(ops)
}

/// Replays `diff` over `base`. Walks base indices 1..len while consuming
/// operations in order: a matching `Delete` drops the line, a matching
/// `Insert` appends its content after the copied line, and `Insert 0`
/// prepends to the output wherever it appears. Insertions past the end of
/// the base are appended after base exhaustion; anything else left over is
/// malformed.
pub fn apply_diff(base: &[String], diff: &Diff) -> AppResult<Vec<String>> {
    let ops = diff.operations();
    let mut out: Vec<String> = Vec::new();
    let mut next = 0usize;

    for (pos, line) in base.iter().enumerate() {
        let cur = pos + 1;
        let mut keep = true;
        let mut appended: Vec<String> = Vec::new();
        while let Some(op) = ops.get(next) {
            match op {
                Operation::Insert { line: 0, content } => {
                    out.splice(0..0, content.iter().cloned());
                }
                Operation::Delete { line } if *line == cur => {
                    keep = false;
                }
                Operation::Insert { line, content } if *line == cur => {
                    appended.extend(content.iter().cloned());
                }
                other if other.line() < cur => {
                    return Err(diff_error(
                        "diff operations are not in ascending line order",
                        serde_json::json!({ "line": other.line(), "position": cur }),
                    ));
                }
                _ => break,
            }
            next += 1;
        }
        if keep {
            out.push(line.clone());
        }
        out.extend(appended);
    }

    while let Some(op) = ops.get(next) {
        match op {
            Operation::Insert { line: 0, content } => {
                out.splice(0..0, content.iter().cloned());
            }
            Operation::Insert { line, content } if *line > base.len() => {
                out.extend(content.iter().cloned());
            }
            other => {
                return Err(diff_error(
                    "diff operation targets a line outside the base sequence",
                    serde_json::json!({ "line": other.line(), "base_len": base.len() }),
                ));
            }
        }
        next += 1;
    }

    Ok(out)
}
