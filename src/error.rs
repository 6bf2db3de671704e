//! Error types for devboard
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, unknown task or column)
//! - 3: Busy (a board sync is already in flight)
//! - 4: Operation failed (network, backend rejection, IO)

use thiserror::Error;

/// Exit codes for the devboard CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const BUSY: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for devboard operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    // Busy (exit code 3)
    #[error("A board sync is already in flight")]
    SyncInFlight,

    // Operation failures (exit code 4)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend rejected {method} {path} with status {status}: {message}")]
    Api {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::UnknownColumn(_)
            | Error::TaskNotFound(_)
            | Error::InvalidDate(_) => exit_codes::USER_ERROR,

            Error::SyncInFlight => exit_codes::BUSY,

            Error::Http(_)
            | Error::Api { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Api {
                method,
                path,
                status,
                message,
            } => Some(serde_json::json!({
                "method": method,
                "path": path,
                "status": status,
                "message": message,
            })),
            Error::UnknownColumn(column) => Some(serde_json::json!({ "column": column })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "task_id": id })),
            Error::InvalidDate(raw) => Some(serde_json::json!({ "date": raw })),
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            _ => None,
        }
    }

    /// True for failures worth retrying by resynchronising with the backend
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Api { .. })
    }
}

/// Result type alias for devboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
