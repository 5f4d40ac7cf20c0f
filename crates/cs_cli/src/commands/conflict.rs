use cs_core::app_error::{AppError, AppResult};
use cs_core::lines::remove_file_if_exists;
use cs_core::scanner::{list_conflict_markers, tree_file_path};
use std::path::Path;

pub fn run_conflict(root: &Path, action: Option<&str>) -> AppResult<()> {
    match action {
        None => {
            for name in list_conflict_markers(root)? {
                println!("{}", name);
            }
            Ok(())
        }
        Some("clean") => {
            let markers = list_conflict_markers(root)?;
            for name in &markers {
                remove_file_if_exists(&tree_file_path(root, name)?)?;
            }
            println!("removed {} conflict files", markers.len());
            Ok(())
        }
        Some(other) => Err(AppError::invalid_argument(
            "conflict takes no argument or `clean`",
            serde_json::json!({ "action": other }),
        )),
    }
}
