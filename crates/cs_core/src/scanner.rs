use crate::app_error::{AppError, AppResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const HIDDEN_DIR: &str = ".caml_sync";
pub const CLIENT_CONFIG_FILE: &str = ".config";
pub const HISTORY_DIR_PREFIX: &str = "camlsync_history_version_";

const ALLOWED_EXTENSIONS: &[&str] = &[
    "ml", "mli", "txt", "sh", "java", "c", "h", "md", "cpp", "py", "jl", "m", "csv", "json",
];

const DENY_PREFIXES: &[&str] = &[
    "./.caml_sync/",
    "./.config",
    "./camlsync_history_version_",
];

fn scanner_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "fs", message, false, details)
}

pub fn has_allowed_extension(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ALLOWED_EXTENSIONS.contains(&ext),
        None => false,
    }
}

pub fn is_denied(name: &str) -> bool {
    DENY_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// A file whose base name (before the final extension) ends in `_local` is
/// a quarantined conflict artifact and is never synced.
pub fn is_conflict_marker(name: &str) -> bool {
    let base = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    base.ends_with("_local")
}

/// `<stem>_local<ext>` sibling of a working-tree name.
pub fn conflict_marker_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_local.{}", stem, ext),
        None => format!("{}_local", name),
    }
}

/// Maps a tree-relative `./`-prefixed name to a path under `root`. Rejects
/// names that escape the tree.
pub fn tree_file_path(root: &Path, name: &str) -> AppResult<PathBuf> {
    let rel = name.strip_prefix("./").unwrap_or(name);
    let rel_path = Path::new(rel);
    let escapes = rel_path.is_absolute()
        || rel_path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
    if escapes {
        return Err(AppError::malformed_diff(
            "file name escapes the project tree",
            serde_json::json!({ "file_name": name }),
        ));
    }
    Ok(root.join(rel_path))
}

fn relative_name(root: &Path, path: &Path) -> AppResult<String> {
    let rel = path.strip_prefix(root).map_err(|e| {
        scanner_error(
            "failed deriving tree-relative path",
            serde_json::json!({ "error": e.to_string(), "path": path, "root": root }),
        )
    })?;
    let mut name = String::from(".");
    for component in rel.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(name)
}

/// All allowlisted files under `dir`, as sorted `./`-prefixed names
/// relative to `dir`. No denylist filtering; used for mirror trees.
pub fn scan_tree(dir: &Path) -> AppResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            scanner_error(
                "failed walking directory tree",
                serde_json::json!({ "error": e.to_string(), "root": dir }),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !has_allowed_extension(entry.path()) {
            continue;
        }
        names.insert(relative_name(dir, entry.path())?);
    }
    Ok(names)
}

/// Project files eligible for sync: allowlisted extension, not under a
/// denylist prefix, not a `_local` conflict artifact.
pub fn scan_working(root: &Path) -> AppResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for name in scan_tree(root)? {
        if is_denied(&name) || is_conflict_marker(&name) {
            continue;
        }
        names.insert(name);
    }
    Ok(names)
}

/// Quarantined `*_local` artifacts currently in the working tree.
pub fn list_conflict_markers(root: &Path) -> AppResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for name in scan_tree(root)? {
        if is_denied(&name) {
            continue;
        }
        if is_conflict_marker(&name) {
            names.insert(name);
        }
    }
    Ok(names)
}
