use cs_core::app_error::{AppError, AppResult};
use cs_core::config::client_config_path;
use cs_core::history::remove_history_dirs;
use cs_core::lines::remove_file_if_exists;
use cs_core::scanner::{list_conflict_markers, tree_file_path};
use cs_core::snapshot::snapshot_dir;
use std::fs;
use std::path::Path;

/// Removes everything the client ever created: configuration, hidden
/// directory, quarantined conflict files, and history trees.
pub fn run_clean(root: &Path) -> AppResult<()> {
    let markers = list_conflict_markers(root)?;
    for name in &markers {
        remove_file_if_exists(&tree_file_path(root, name)?)?;
    }
    let history_trees = remove_history_dirs(root)?;
    let hidden = snapshot_dir(root);
    if hidden.exists() {
        fs::remove_dir_all(&hidden).map_err(|e| {
            AppError::new(
                "CS_IO_FAILED",
                "fs",
                "failed removing hidden directory",
                false,
                serde_json::json!({ "error": e.to_string(), "path": hidden }),
            )
        })?;
    }
    remove_file_if_exists(&client_config_path(root))?;
    println!(
        "cleaned client state ({} conflict files, {} history trees)",
        markers.len(),
        history_trees
    );
    Ok(())
}
