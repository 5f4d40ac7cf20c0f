use crate::client::SyncClient;
use cs_core::app_error::AppResult;
use cs_core::config::{load_client_config, store_client_config};
use cs_core::reconcile::{
    apply_server_diff, both_modified, compare_working_backup, ensure_no_conflict_markers,
    outgoing_diff, quarantine_conflicts,
};
use std::path::Path;

/// One full reconciliation: derive local changes, pull the server delta,
/// quarantine both-modified files, merge, then push whatever survives.
pub fn run_sync(root: &Path) -> AppResult<()> {
    let mut config = load_client_config(root)?;
    ensure_no_conflict_markers(root)?;

    let local = compare_working_backup(root)?;
    let client = SyncClient::new(&config.url, &config.token)?;

    let latest = client.get_latest_version()?;
    if latest == config.version && local.is_empty() {
        println!("already up to date at version {}", config.version);
        return Ok(());
    }

    let server_diff = client.get_update_diff(config.version)?;

    let conflicts = both_modified(&local, &server_diff);
    let quarantined = quarantine_conflicts(root, &local, &conflicts)?;
    apply_server_diff(root, &server_diff)?;
    config.version = server_diff.cur_version;
    store_client_config(root, &config)?;

    for (name, marker) in &quarantined {
        println!("conflict: {} (your edits kept at {})", name, marker);
    }

    let outgoing = outgoing_diff(local, &conflicts, config.version);
    if outgoing.edited_files.is_empty() {
        println!("synced at version {}", config.version);
        return Ok(());
    }

    let pushed = client.post_local_diff(&outgoing)?;
    config.version = pushed;
    store_client_config(root, &config)?;
    println!("pushed version {}", pushed);
    Ok(())
}
