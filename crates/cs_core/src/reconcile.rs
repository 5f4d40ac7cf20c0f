use crate::app_error::{AppError, AppResult};
use crate::diff::{apply_diff, calc_diff};
use crate::lines::{read_lines, read_lines_or_empty, remove_file_if_exists, write_lines};
use crate::scanner::{conflict_marker_name, list_conflict_markers, scan_working, tree_file_path};
use crate::snapshot::{backup_working_tree, clear_snapshot, snapshot_file_path, snapshot_paths};
use crate::wire::{FileDiff, VersionDiff};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn reconcile_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "sync", message, false, details)
}

/// Aborts a sync while `*_local` quarantine artifacts are still present.
pub fn ensure_no_conflict_markers(root: &Path) -> AppResult<()> {
    let markers = list_conflict_markers(root)?;
    if markers.is_empty() {
        return Ok(());
    }
    Err(AppError::conflict_pending(
        "unresolved conflict files present; resolve or remove *_local files before syncing",
        serde_json::json!({ "files": markers.iter().collect::<Vec<_>>() }),
    ))
}

/// Derives the client's local changes since the last sync by comparing the
/// working tree against the hidden snapshot.
pub fn compare_working_backup(root: &Path) -> AppResult<Vec<FileDiff>> {
    let working = scan_working(root)?;
    let snapshot = snapshot_paths(root)?;
    let mut out = Vec::new();

    for name in working.union(&snapshot) {
        let in_working = working.contains(name);
        let in_snapshot = snapshot.contains(name);
        if in_working && in_snapshot {
            let base = read_lines(&snapshot_file_path(root, name)?)?;
            let cur = read_lines(&tree_file_path(root, name)?)?;
            let content_diff = calc_diff(&base, &cur);
            if !content_diff.is_empty() {
                out.push(FileDiff::edited(name, content_diff));
            }
        } else if in_snapshot {
            out.push(FileDiff::deleted(name));
        } else {
            let cur = read_lines(&tree_file_path(root, name)?)?;
            out.push(FileDiff::edited(name, calc_diff(&[], &cur)));
        }
    }
    Ok(out)
}

/// Files edited (or deleted) on both sides, matched by name.
pub fn both_modified(local: &[FileDiff], server: &VersionDiff) -> BTreeSet<String> {
    let server_names: BTreeSet<&str> = server
        .edited_files
        .iter()
        .map(|fd| fd.file_name.as_str())
        .collect();
    local
        .iter()
        .filter(|fd| server_names.contains(fd.file_name.as_str()))
        .map(|fd| fd.file_name.clone())
        .collect()
}

/// Moves every both-modified working file out of the way: the user's copy
/// is renamed `<stem>_local<ext>` and the snapshot content is restored at
/// the original name, so the server's version can be applied there. A
/// locally-deleted conflict needs no rename; the server's version wins.
/// Returns the quarantined names paired with their marker names.
pub fn quarantine_conflicts(
    root: &Path,
    local: &[FileDiff],
    conflicts: &BTreeSet<String>,
) -> AppResult<Vec<(String, String)>> {
    let mut quarantined = Vec::new();
    for fd in local {
        if !conflicts.contains(&fd.file_name) {
            continue;
        }
        let working = tree_file_path(root, &fd.file_name)?;
        if fd.is_deleted {
            remove_file_if_exists(&working)?;
            continue;
        }
        let marker = conflict_marker_name(&fd.file_name);
        let marker_path = tree_file_path(root, &marker)?;
        if marker_path.exists() {
            return Err(AppError::file_existed(
                "conflict marker target already exists",
                serde_json::json!({ "path": marker_path }),
            ));
        }
        fs::rename(&working, &marker_path).map_err(|e| {
            reconcile_error(
                "failed renaming conflicted file",
                serde_json::json!({ "error": e.to_string(), "from": working, "to": marker_path }),
            )
        })?;
        let snapshot = snapshot_file_path(root, &fd.file_name)?;
        if snapshot.exists() {
            fs::copy(&snapshot, &working).map_err(|e| {
                reconcile_error(
                    "failed restoring snapshot copy of conflicted file",
                    serde_json::json!({ "error": e.to_string(), "from": snapshot, "to": working }),
                )
            })?;
        }
        quarantined.push((fd.file_name.clone(), marker));
    }
    Ok(quarantined)
}

/// Applies the server delta to the working tree and refreshes the hidden
/// mirror from the merged result.
pub fn apply_server_diff(root: &Path, server: &VersionDiff) -> AppResult<()> {
    clear_snapshot(root)?;
    for fd in &server.edited_files {
        let path = tree_file_path(root, &fd.file_name)?;
        if fd.is_deleted {
            remove_file_if_exists(&path)?;
            continue;
        }
        let base = read_lines_or_empty(&path)?;
        let merged = apply_diff(&base, &fd.content_diff)?;
        write_lines(&path, &merged)?;
    }
    backup_working_tree(root)
}

/// Local changes that survive conflict removal, stamped with the client's
/// current version; the server assigns the next number on accept.
pub fn outgoing_diff(
    local: Vec<FileDiff>,
    conflicts: &BTreeSet<String>,
    version: u64,
) -> VersionDiff {
    let edited_files: Vec<FileDiff> = local
        .into_iter()
        .filter(|fd| !conflicts.contains(&fd.file_name))
        .collect();
    VersionDiff {
        prev_version: version,
        cur_version: version,
        edited_files,
    }
}
