use cs_core::app_error::{AppError, AppResult};
use cs_core::wire::{HistoryLog, VersionDiff, VersionResp};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking protocol adapter over the server's HTTP surface. Each request
/// is raced against a five second deadline; the loser is dropped and no
/// client state changes on any failure path.
pub struct SyncClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    token: String,
}

fn transport_error(message: &str, details: serde_json::Value) -> AppError {
    AppError::server_error(message, details)
}

fn error_for_status(status: reqwest::StatusCode, body: &[u8]) -> AppError {
    let body_text = String::from_utf8_lossy(body).trim().to_string();
    match status {
        reqwest::StatusCode::UNAUTHORIZED => AppError::unauthorized(
            "server rejected the sync token",
            serde_json::json!({ "body": body_text }),
        ),
        reqwest::StatusCode::BAD_REQUEST => AppError::bad_request(
            "server rejected the request",
            serde_json::json!({ "body": body_text }),
        ),
        other => transport_error(
            "server returned an unexpected status",
            serde_json::json!({ "status": other.as_u16(), "body": body_text }),
        ),
    }
}

impl SyncClient {
    pub fn new(url: &str, token: &str) -> AppResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                transport_error(
                    "failed starting client runtime",
                    serde_json::json!({ "error": e.to_string() }),
                )
            })?;
        let http = reqwest::Client::builder().build().map_err(|e| {
            transport_error(
                "failed building http client",
                serde_json::json!({ "error": e.to_string() }),
            )
        })?;
        let trimmed = url.trim_end_matches('/');
        let base_url = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
        Ok(Self {
            http,
            runtime,
            base_url,
            token: token.to_string(),
        })
    }

    fn endpoint(&self, path: &str, extra: &str) -> String {
        format!("{}{}?token={}{}", self.base_url, path, self.token, extra)
    }

    fn execute(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<Vec<u8>> {
        tracing::debug!(endpoint, "issuing sync request");
        self.runtime.block_on(async {
            let raced = tokio::time::timeout(REQUEST_TIMEOUT, async {
                let resp = request.send().await?;
                let status = resp.status();
                let body = resp.bytes().await?;
                Ok::<_, reqwest::Error>((status, body))
            })
            .await;
            match raced {
                Err(_) => Err(AppError::timeout(
                    "request exceeded the five second deadline",
                    serde_json::json!({ "endpoint": endpoint }),
                )),
                Ok(Err(e)) => Err(transport_error(
                    "request failed in transit",
                    serde_json::json!({ "error": e.to_string(), "endpoint": endpoint }),
                )),
                Ok(Ok((status, body))) => {
                    if status.is_success() {
                        Ok(body.to_vec())
                    } else {
                        Err(error_for_status(status, &body))
                    }
                }
            }
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, extra: &str) -> AppResult<T> {
        let url = self.endpoint(path, extra);
        let body = self.execute(path, self.http.get(&url))?;
        serde_json::from_slice(&body).map_err(|e| {
            transport_error(
                "failed parsing server response",
                serde_json::json!({ "error": e.to_string(), "endpoint": path }),
            )
        })
    }

    pub fn get_latest_version(&self) -> AppResult<u64> {
        let resp: VersionResp = self.get_json("/version", "")?;
        Ok(resp.version)
    }

    pub fn get_update_diff(&self, from: u64) -> AppResult<VersionDiff> {
        self.get_json("/diff", &format!("&from={}", from))
    }

    /// Combined delta from the empty tree to `to`; applying it to nothing
    /// reconstructs the full state at that version.
    pub fn get_version_state_diff(&self, to: u64) -> AppResult<VersionDiff> {
        self.get_json("/diff", &format!("&from=0&to={}", to))
    }

    pub fn get_history(&self) -> AppResult<HistoryLog> {
        self.get_json("/history", "")
    }

    pub fn post_local_diff(&self, vd: &VersionDiff) -> AppResult<u64> {
        let url = self.endpoint("/diff", "");
        let body = self.execute("/diff", self.http.post(&url).json(vd))?;
        let resp: VersionResp = serde_json::from_slice(&body).map_err(|e| {
            transport_error(
                "failed parsing push response",
                serde_json::json!({ "error": e.to_string() }),
            )
        })?;
        Ok(resp.version)
    }
}
