use rmcp::service::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to open event stream: {0}")]
    Transport(String),
    #[error("initialize handshake failed: {0}")]
    Initialize(String),
    #[error("tool provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("tool provider request failed: {0}")]
    Service(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ServiceError> for McpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::McpError(data) => McpError::Rpc {
                code: i64::from(data.code.0),
                message: data.message.to_string(),
            },
            other => McpError::Service(other.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
