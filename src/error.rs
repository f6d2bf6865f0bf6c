//! Error Types
//!
//! Every failure the helper can surface, from a missing argument up to a
//! malformed chat completion body.

use crate::api::ApiError;
use thiserror::Error;

/// Substring the API uses to reject multimodal input on text-only models
pub const IMAGE_UNSUPPORTED_MARKER: &str = "image input is not supported";

/// Main error type for helper operations
#[derive(Debug, Error)]
pub enum CmdHelperError {
    /// No command was given on the command line
    #[error("missing command argument\nUsage: {program} \"<command_to_fix>\"")]
    MissingArgument { program: String },

    /// `LLM_API_TOKEN` is unset or empty
    #[error("environment variable LLM_API_TOKEN is not set")]
    MissingToken,

    /// Configuration file could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be built (bad URL, unencodable header, ...)
    #[error("Failed to build request: {0}")]
    RequestConstruction(String),

    /// Transport failure while sending or reading
    #[error("Request failed: {0}")]
    Network(String),

    /// Overall request timeout elapsed
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-2xx status
    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    /// The model rejected image input
    #[error("Model does not support image input (details: {0})")]
    ImageUnsupported(String),

    /// In-band error object inside a 2xx JSON body
    #[error("API returned an error in JSON: {0}")]
    ApiJson(ApiError),

    /// The event stream broke while being read
    #[error("Streaming error: {0}")]
    StreamRead(String),

    /// 2xx response (JSON or stream) without any content
    #[error("API returned a response without content")]
    EmptyResponse,

    /// Neither JSON nor an event stream
    #[error("Unexpected response Content-Type: {content_type}. Body: {body}")]
    UnexpectedContentType { content_type: String, body: String },

    /// Response body was not the JSON we expected
    #[error("JSON parsing error: {message} (body: {body})")]
    JsonParse { message: String, body: String },
}

impl From<reqwest::Error> for CmdHelperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CmdHelperError::Timeout(err.to_string())
        } else if err.is_connect() {
            CmdHelperError::Network(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            CmdHelperError::RequestConstruction(err.to_string())
        } else {
            CmdHelperError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CmdHelperError {
    fn from(err: serde_json::Error) -> Self {
        CmdHelperError::JsonParse {
            message: err.to_string(),
            body: String::new(),
        }
    }
}

/// Result type alias for helper operations
pub type Result<T> = std::result::Result<T, CmdHelperError>;
