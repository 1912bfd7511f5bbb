//! Error types for the oilwatch service

/// Errors that can occur in the oilwatch service
#[derive(Debug, thiserror::Error)]
pub enum OilwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {0}")]
    MalformedResponse(String),

    #[error("Poll task failed: {0}")]
    PollTask(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for oilwatch operations
pub type Result<T> = std::result::Result<T, OilwatchError>;
