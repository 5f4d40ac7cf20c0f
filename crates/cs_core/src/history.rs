use crate::app_error::{AppError, AppResult};
use crate::compose::State;
use crate::lines::write_lines;
use crate::scanner::{tree_file_path, HISTORY_DIR_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};

fn history_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "history", message, false, details)
}

pub fn history_dir(root: &Path, version: u64) -> PathBuf {
    root.join(format!("{}{}", HISTORY_DIR_PREFIX, version))
}

/// Writes a reconstructed project state as a standalone tree. Any previous
/// materialization of the same version is replaced.
pub fn materialize_state(dir: &Path, state: &State) -> AppResult<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| {
            history_error(
                "failed removing stale history tree",
                serde_json::json!({ "error": e.to_string(), "path": dir }),
            )
        })?;
    }
    fs::create_dir_all(dir).map_err(|e| {
        history_error(
            "failed creating history tree",
            serde_json::json!({ "error": e.to_string(), "path": dir }),
        )
    })?;
    for (name, lines) in state {
        write_lines(&tree_file_path(dir, name)?, lines)?;
    }
    Ok(())
}

/// Removes every `camlsync_history_version_<N>` tree under `root`.
pub fn remove_history_dirs(root: &Path) -> AppResult<usize> {
    let entries = fs::read_dir(root).map_err(|e| {
        history_error(
            "failed listing project root",
            serde_json::json!({ "error": e.to_string(), "path": root }),
        )
    })?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| {
            history_error(
                "failed reading project root entry",
                serde_json::json!({ "error": e.to_string(), "path": root }),
            )
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(HISTORY_DIR_PREFIX) || !entry.path().is_dir() {
            continue;
        }
        fs::remove_dir_all(entry.path()).map_err(|e| {
            history_error(
                "failed removing history tree",
                serde_json::json!({ "error": e.to_string(), "path": entry.path() }),
            )
        })?;
        removed += 1;
    }
    Ok(removed)
}
