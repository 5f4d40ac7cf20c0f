//! HTTP surface of the sync server.
//!
//! Every endpoint authorizes against the `token` query parameter before
//! anything else. Reads are served against the version counter observed at
//! request start; `POST /diff` appends are serialized behind a process-wide
//! lock so version numbers advance strictly one at a time.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::UNIX_EPOCH;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use cs_core::compose::compose_version_diff;
use cs_core::config::{load_server_config, ServerConfig};
use cs_core::version_store::{append_version_diff, version_diff_path};
use cs_core::wire::{parse_version_diff, HistoryEntry, HistoryLog};

pub struct ServerState {
    pub root: PathBuf,
    append_lock: Mutex<()>,
}

impl ServerState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            append_lock: Mutex::new(()),
        }
    }
}

pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/version", get(get_version))
        .route("/diff", get(get_diff).post(post_diff))
        .route("/history", get(get_history))
        .with_state(state)
}

pub async fn serve(root: PathBuf, listener: tokio::net::TcpListener) -> std::io::Result<()> {
    let state = Arc::new(ServerState::new(root));
    axum::serve(listener, build_router(state)).await
}

fn authorize(
    state: &ServerState,
    params: &HashMap<String, String>,
) -> Result<ServerConfig, Response> {
    let config = match load_server_config(&state.root) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = %e.code, "failed loading server configuration");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.message).into_response());
        }
    };
    match params.get("token") {
        Some(token) if *token == config.token => Ok(config),
        _ => Err((StatusCode::UNAUTHORIZED, "Unauthorized Access").into_response()),
    }
}

async fn get_version(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let config = match authorize(&state, &params) {
        Ok(config) => config,
        Err(resp) => return resp,
    };
    Json(serde_json::json!({ "version": config.version })).into_response()
}

async fn get_diff(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let config = match authorize(&state, &params) {
        Ok(config) => config,
        Err(resp) => return resp,
    };
    let from = match params.get("from").and_then(|raw| raw.parse::<u64>().ok()) {
        Some(from) => from,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                "missing or non-integer `from` parameter",
            )
                .into_response();
        }
    };
    let to = match params.get("to") {
        None => config.version,
        Some(raw) => match raw.parse::<u64>() {
            Ok(to) => to,
            Err(_) => {
                return (StatusCode::BAD_REQUEST, "non-integer `to` parameter").into_response();
            }
        },
    };
    if from > config.version || to > config.version || from > to {
        return (
            StatusCode::BAD_REQUEST,
            "requested version range is out of bounds",
        )
            .into_response();
    }
    match compose_version_diff(&state.root, from, to) {
        Ok(vd) => Json(vd).into_response(),
        Err(e) => {
            tracing::error!(code = %e.code, from, to, "failed composing version diff");
            (StatusCode::INTERNAL_SERVER_ERROR, e.message).into_response()
        }
    }
}

async fn post_diff(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if let Err(resp) = authorize(&state, &params) {
        return resp;
    }
    let vd = match parse_version_diff(&body) {
        Ok(vd) => vd,
        Err(e) => return (StatusCode::BAD_REQUEST, e.message).into_response(),
    };
    let guard = state.append_lock.lock();
    let _guard = match guard {
        Ok(guard) => guard,
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "append lock poisoned".to_string())
                .into_response();
        }
    };
    match append_version_diff(&state.root, &vd) {
        Ok(version) => {
            tracing::info!(version, files = vd.edited_files.len(), "appended version diff");
            Json(serde_json::json!({ "version": version })).into_response()
        }
        Err(e) => {
            tracing::error!(code = %e.code, "failed appending version diff");
            (StatusCode::INTERNAL_SERVER_ERROR, e.message).into_response()
        }
    }
}

async fn get_history(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let config = match authorize(&state, &params) {
        Ok(config) => config,
        Err(resp) => return resp,
    };
    let mut log = Vec::new();
    for version in 0..=config.version {
        let path = version_diff_path(&state.root, version);
        let timestamp = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_secs_f64());
        if let Some(timestamp) = timestamp {
            log.push(HistoryEntry { version, timestamp });
        }
    }
    Json(HistoryLog { log }).into_response()
}
