use crate::app_error::{AppError, AppResult};
use crate::scanner::{scan_tree, scan_working, tree_file_path, HIDDEN_DIR};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

fn snapshot_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "fs", message, false, details)
}

pub fn snapshot_dir(root: &Path) -> PathBuf {
    root.join(HIDDEN_DIR)
}

pub fn snapshot_file_path(root: &Path, name: &str) -> AppResult<PathBuf> {
    tree_file_path(&snapshot_dir(root), name)
}

fn create_hidden_dir(path: &Path) -> AppResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o770);
    }
    builder.create(path).map_err(|e| {
        snapshot_error(
            "failed creating hidden snapshot directory",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })
}

pub fn init_snapshot_dir(root: &Path) -> AppResult<()> {
    create_hidden_dir(&snapshot_dir(root))
}

/// Snapshot names translated to working-tree shape (`./`-prefixed paths
/// relative to the project root).
pub fn snapshot_paths(root: &Path) -> AppResult<BTreeSet<String>> {
    let dir = snapshot_dir(root);
    if !dir.exists() {
        return Err(AppError::not_initialized(
            "hidden snapshot directory is missing",
            serde_json::json!({ "path": dir }),
        ));
    }
    scan_tree(&dir)
}

/// Mirrors every syncable working-tree file into the hidden tree at the
/// same relative path. Conflict artifacts and denylisted paths stay out of
/// the mirror.
pub fn backup_working_tree(root: &Path) -> AppResult<()> {
    let dir = snapshot_dir(root);
    if !dir.exists() {
        return Err(AppError::not_initialized(
            "hidden snapshot directory is missing",
            serde_json::json!({ "path": dir }),
        ));
    }
    for name in scan_working(root)? {
        let src = tree_file_path(root, &name)?;
        let dst = tree_file_path(&dir, &name)?;
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                snapshot_error(
                    "failed creating snapshot parent directory",
                    serde_json::json!({ "error": e.to_string(), "path": parent }),
                )
            })?;
        }
        fs::copy(&src, &dst).map_err(|e| {
            snapshot_error(
                "failed copying file into snapshot",
                serde_json::json!({ "error": e.to_string(), "from": src, "to": dst }),
            )
        })?;
    }
    Ok(())
}

/// Removes the hidden tree and recreates it empty.
pub fn clear_snapshot(root: &Path) -> AppResult<()> {
    let dir = snapshot_dir(root);
    if dir.exists() {
        fs::remove_dir_all(&dir).map_err(|e| {
            snapshot_error(
                "failed clearing snapshot directory",
                serde_json::json!({ "error": e.to_string(), "path": dir }),
            )
        })?;
    }
    create_hidden_dir(&dir)
}
