use crate::app_error::{AppError, AppResult};
use std::fs;
use std::path::Path;

fn io_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "fs", message, false, details)
}

/// Splits file content into lines without the trailing newline entry, so a
/// write/read round trip is stable.
pub fn read_lines(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        return Err(AppError::file_not_found(
            "file to read does not exist",
            serde_json::json!({ "path": path }),
        ));
    }
    let content = fs::read_to_string(path).map_err(|e| {
        io_error(
            "failed reading file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    Ok(content.lines().map(|l| l.to_string()).collect())
}

pub fn read_lines_or_empty(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_lines(path)
}

/// Deletes any existing file at `path`, then writes `lines` joined with
/// newlines (trailing newline on non-empty content). Creates parents.
pub fn write_lines(path: &Path, lines: &[String]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            io_error(
                "failed creating parent directory",
                serde_json::json!({ "error": e.to_string(), "path": parent }),
            )
        })?;
    }
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            io_error(
                "failed removing file before rewrite",
                serde_json::json!({ "error": e.to_string(), "path": path }),
            )
        })?;
    }
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content).map_err(|e| {
        io_error(
            "failed writing file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })
}

pub fn remove_file_if_exists(path: &Path) -> AppResult<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(path).map_err(|e| {
        io_error(
            "failed removing file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })
}
