use crate::client::SyncClient;
use cs_core::app_error::{AppError, AppResult};
use cs_core::compose::{apply_version_diff_to_state, State};
use cs_core::config::load_client_config;
use cs_core::history::{history_dir, materialize_state, remove_history_dirs};
use std::path::Path;

pub fn run_history(root: &Path, target: Option<&str>) -> AppResult<()> {
    match target {
        Some("list") => run_list(root),
        Some("clean") => {
            let removed = remove_history_dirs(root)?;
            println!("removed {} history trees", removed);
            Ok(())
        }
        Some(raw) => match raw.parse::<u64>() {
            Ok(version) => run_download(root, version),
            Err(_) => Err(AppError::invalid_argument(
                "history takes `list`, `clean`, or a version number",
                serde_json::json!({ "target": raw }),
            )),
        },
        None => Err(AppError::invalid_argument(
            "history takes `list`, `clean`, or a version number",
            serde_json::json!({}),
        )),
    }
}

fn run_list(root: &Path) -> AppResult<()> {
    let config = load_client_config(root)?;
    let client = SyncClient::new(&config.url, &config.token)?;
    let log = client.get_history()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&log).unwrap_or_else(|_| "{}".to_string())
    );
    Ok(())
}

/// Downloads version `version` as a standalone tree; the working tree is
/// left untouched.
fn run_download(root: &Path, version: u64) -> AppResult<()> {
    let config = load_client_config(root)?;
    let client = SyncClient::new(&config.url, &config.token)?;
    let vd = client.get_version_state_diff(version)?;
    let mut state = State::new();
    apply_version_diff_to_state(&mut state, &vd)?;
    let dir = history_dir(root, version);
    materialize_state(&dir, &state)?;
    println!("materialized version {} at {}", version, dir.display());
    Ok(())
}
