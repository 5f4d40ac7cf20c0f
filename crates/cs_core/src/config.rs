use crate::app_error::{AppError, AppResult};
use crate::scanner::CLIENT_CONFIG_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SERVER_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_SERVER_URL: &str = "127.0.0.1:8080";
pub const DEFAULT_TOKEN: &str = "default";
pub const DEFAULT_SERVER_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub url: String,
    pub token: String,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_id: String,
    pub url: String,
    pub token: String,
    pub port: u16,
    pub version: u64,
}

fn config_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::new("CS_IO_FAILED", "config", message, false, details)
}

pub fn default_client_config(url: &str, token: &str) -> ClientConfig {
    ClientConfig {
        client_id: Uuid::new_v4().to_string(),
        url: url.to_string(),
        token: token.to_string(),
        version: 0,
    }
}

pub fn default_server_config(token: &str) -> ServerConfig {
    ServerConfig {
        server_id: Uuid::new_v4().to_string(),
        url: "127.0.0.1".to_string(),
        token: token.to_string(),
        port: DEFAULT_SERVER_PORT,
        version: 0,
    }
}

pub fn client_config_path(root: &Path) -> PathBuf {
    root.join(CLIENT_CONFIG_FILE)
}

pub fn server_config_path(root: &Path) -> PathBuf {
    root.join(SERVER_CONFIG_FILE)
}

fn load_config<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> AppResult<T> {
    if !path.exists() {
        return Err(AppError::not_initialized(
            "configuration file is missing",
            serde_json::json!({ "path": path, "config": what }),
        ));
    }
    let bytes = fs::read(path).map_err(|e| {
        config_error(
            "failed reading configuration",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        config_error(
            "failed parsing configuration",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })
}

fn store_config<T: Serialize>(path: &Path, config: &T) -> AppResult<()> {
    let content = serde_json::to_string_pretty(config).map_err(|e| {
        config_error(
            "failed serializing configuration",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    fs::write(path, content).map_err(|e| {
        config_error(
            "failed writing configuration",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })
}

pub fn load_client_config(root: &Path) -> AppResult<ClientConfig> {
    load_config(&client_config_path(root), "client")
}

pub fn store_client_config(root: &Path, config: &ClientConfig) -> AppResult<()> {
    store_config(&client_config_path(root), config)
}

pub fn load_server_config(root: &Path) -> AppResult<ServerConfig> {
    load_config(&server_config_path(root), "server")
}

pub fn store_server_config(root: &Path, config: &ServerConfig) -> AppResult<()> {
    store_config(&server_config_path(root), config)
}
