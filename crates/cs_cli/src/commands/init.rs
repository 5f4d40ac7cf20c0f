use crate::commands::sync;
use cs_core::app_error::{AppError, AppResult};
use cs_core::config::{
    client_config_path, default_client_config, store_client_config, DEFAULT_SERVER_URL,
    DEFAULT_TOKEN,
};
use cs_core::snapshot::init_snapshot_dir;
use std::path::Path;

pub fn run_init(root: &Path, url: Option<&str>, token: Option<&str>) -> AppResult<()> {
    let (url, token) = match (url, token) {
        (None, None) => (DEFAULT_SERVER_URL.to_string(), DEFAULT_TOKEN.to_string()),
        (Some(url), Some(token)) => (url.to_string(), token.to_string()),
        _ => {
            return Err(AppError::invalid_argument(
                "init takes either no arguments or a url and a token",
                serde_json::json!({}),
            ));
        }
    };
    let config_path = client_config_path(root);
    if config_path.exists() {
        return Err(AppError::file_existed(
            "client is already initialized",
            serde_json::json!({ "path": config_path }),
        ));
    }
    store_client_config(root, &default_client_config(&url, &token))?;
    init_snapshot_dir(root)?;
    println!("initialized client against {}", url);
    sync::run_sync(root)
}
