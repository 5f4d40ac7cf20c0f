use cs_core::app_error::{AppError, AppResult};
use cs_core::lines::remove_file_if_exists;
use cs_core::scanner::{scan_working, tree_file_path};
use cs_core::snapshot::{snapshot_file_path, snapshot_paths};
use std::fs;
use std::path::Path;

fn checkout_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "fs", message, false, details)
}

/// Discards local changes: every snapshot file is restored to the working
/// tree and working files without a snapshot counterpart are removed.
pub fn run_checkout(root: &Path) -> AppResult<()> {
    let snapshot = snapshot_paths(root)?;
    let working = scan_working(root)?;

    for name in &snapshot {
        let src = snapshot_file_path(root, name)?;
        let dst = tree_file_path(root, name)?;
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                checkout_error(
                    "failed creating working-tree parent directory",
                    serde_json::json!({ "error": e.to_string(), "path": parent }),
                )
            })?;
        }
        remove_file_if_exists(&dst)?;
        fs::copy(&src, &dst).map_err(|e| {
            checkout_error(
                "failed restoring file from snapshot",
                serde_json::json!({ "error": e.to_string(), "from": src, "to": dst }),
            )
        })?;
    }
    for name in working.difference(&snapshot) {
        remove_file_if_exists(&tree_file_path(root, name)?)?;
    }
    println!("checked out {} files from the last synced snapshot", snapshot.len());
    Ok(())
}
