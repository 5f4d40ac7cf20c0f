use cs_core::app_error::AppResult;
use cs_core::config::load_client_config;
use cs_core::reconcile::compare_working_backup;
use std::path::Path;

pub fn run_status(root: &Path) -> AppResult<()> {
    let config = load_client_config(root)?;
    println!("version: {}", config.version);
    for fd in compare_working_backup(root)? {
        let kind = if fd.is_deleted { "deleted" } else { "modified" };
        println!("{} {}", kind, fd.file_name);
    }
    Ok(())
}
