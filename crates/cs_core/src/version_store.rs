use crate::app_error::{AppError, AppResult};
use crate::config::{
    default_server_config, load_server_config, server_config_path, store_server_config,
    ServerConfig,
};
use crate::wire::{build_version_diff, parse_version_diff, VersionDiff};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn store_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "version_store", message, false, details)
}

pub fn version_diff_path(root: &Path, version: u64) -> PathBuf {
    root.join(format!("version_{}.diff", version))
}

fn write_diff_file(path: &Path, vd: &VersionDiff) -> AppResult<()> {
    let bytes = build_version_diff(vd)?;
    let tmp = path.with_extension("diff.tmp");
    let mut file = fs::File::create(&tmp).map_err(|e| {
        store_error(
            "failed creating version diff temp file",
            serde_json::json!({ "error": e.to_string(), "path": tmp }),
        )
    })?;
    let written = file
        .write_all(&bytes)
        .and_then(|_| file.sync_all())
        .and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(store_error(
            "failed persisting version diff file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        ));
    }
    Ok(())
}

/// Writes the default server configuration and the identity `version_0.diff`.
pub fn server_init(root: &Path, token: &str) -> AppResult<ServerConfig> {
    let config_path = server_config_path(root);
    if config_path.exists() {
        return Err(AppError::file_existed(
            "server is already initialized",
            serde_json::json!({ "path": config_path }),
        ));
    }
    let config = default_server_config(token);
    write_diff_file(&version_diff_path(root, 0), &VersionDiff::identity(0))?;
    store_server_config(root, &config)?;
    Ok(config)
}

pub fn read_version_diff(root: &Path, version: u64) -> AppResult<VersionDiff> {
    let path = version_diff_path(root, version);
    if !path.exists() {
        return Err(AppError::file_not_found(
            "stored version diff does not exist",
            serde_json::json!({ "path": path, "version": version }),
        ));
    }
    let bytes = fs::read(&path).map_err(|e| {
        store_error(
            "failed reading stored version diff",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    parse_version_diff(&bytes)
}

/// Accepts a pushed version diff: rewrites it against the current version,
/// persists `version_<N+1>.diff` (temp file, fsync, rename), then advances
/// the config counter. A failure before the counter rewrite leaves the
/// stored family untouched as far as readers are concerned, since readers
/// never look past `config.version`.
pub fn append_version_diff(root: &Path, vd: &VersionDiff) -> AppResult<u64> {
    let mut config = load_server_config(root)?;
    let next = config.version + 1;
    let rewritten = VersionDiff {
        prev_version: config.version,
        cur_version: next,
        edited_files: vd.edited_files.clone(),
    };
    write_diff_file(&version_diff_path(root, next), &rewritten)?;
    config.version = next;
    store_server_config(root, &config)?;
    Ok(next)
}
