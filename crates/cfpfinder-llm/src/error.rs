//! Error types for the chat completions client.

use thiserror::Error;

/// A specialized Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised while talking to a chat completions endpoint.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint could not be reached.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },

    /// The response body was not the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The response carried no choice.
    #[error("Response contained no choices")]
    NoChoices,

    /// Tool call arguments were not a JSON object.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    ToolArguments {
        /// Tool name.
        tool: String,
        /// Parse failure.
        reason: String,
    },
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<LlmError> for cfpfinder_core::error::CfpError {
    fn from(err: LlmError) -> Self {
        Self::sampling(err.to_string())
    }
}
