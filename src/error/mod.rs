//! Error types for Drover.

use strum::Display;
use thiserror::Error;

/// Why the response processor rejected an otherwise complete stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StreamRejection {
    /// The stream ended without an explicit finish reason.
    MissingFinishReason,
    /// The stream finished but accumulated no answer text.
    EmptyText,
}

/// Primary error type for all Drover operations.
#[derive(Error, Debug)]
pub enum DroverError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unauthorized tool: {0}")]
    UnauthorizedTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid model stream: {reason}")]
    InvalidStream { reason: StreamRejection },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DroverError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Rate limits and server-side failures are transient; content-validity
    /// rejections are retried because a fresh sample may produce a usable
    /// stream. Any other client error propagates immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Stream(_) | Self::InvalidStream { .. } => true,
            Self::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DroverError>;
