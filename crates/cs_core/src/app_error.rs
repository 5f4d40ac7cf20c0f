use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub schema_version: u32,
    pub code: String,
    pub category: String,
    pub message: String,
    pub retryable: bool,
    pub details: Value,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: &str, category: &str, message: &str, retryable: bool, details: Value) -> Self {
        Self {
            schema_version: 1,
            code: code.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            retryable,
            details,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self::new("CS_INTERNAL_ERROR", "internal", message, false, json!({}))
    }

    pub fn not_initialized(message: &str, details: Value) -> Self {
        Self::new("CS_NOT_INITIALIZED", "config", message, false, details)
    }

    pub fn unauthorized(message: &str, details: Value) -> Self {
        Self::new("CS_UNAUTHORIZED", "protocol", message, false, details)
    }

    pub fn bad_request(message: &str, details: Value) -> Self {
        Self::new("CS_BAD_REQUEST", "protocol", message, false, details)
    }

    pub fn server_error(message: &str, details: Value) -> Self {
        Self::new("CS_SERVER_ERROR", "protocol", message, false, details)
    }

    pub fn timeout(message: &str, details: Value) -> Self {
        Self::new("CS_TIMEOUT", "protocol", message, true, details)
    }

    pub fn file_existed(message: &str, details: Value) -> Self {
        Self::new("CS_FILE_EXISTED", "fs", message, false, details)
    }

    pub fn file_not_found(message: &str, details: Value) -> Self {
        Self::new("CS_FILE_NOT_FOUND", "fs", message, false, details)
    }

    pub fn malformed_diff(message: &str, details: Value) -> Self {
        Self::new("CS_MALFORMED_DIFF", "diff", message, false, details)
    }

    pub fn invalid_argument(message: &str, details: Value) -> Self {
        Self::new("CS_INVALID_ARGUMENT", "cli", message, false, details)
    }

    pub fn conflict_pending(message: &str, details: Value) -> Self {
        Self::new("CS_CONFLICT_PENDING", "sync", message, false, details)
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code == code
    }
}
