//! Chat Completion API
//!
//! Request and response types for the OpenAI-compatible chat endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Model identifier
    pub model: &'a str,

    /// Messages in the conversation
    pub messages: &'a [ChatMessage],

    /// Ask for an event stream. The server may still answer with plain JSON.
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    /// Create a streaming request
    pub fn new(model: &'a str, messages: &'a [ChatMessage]) -> Self {
        Self {
            model,
            messages,
            stream: true,
        }
    }
}

/// Structured error object returned by the API, either in an error body or
/// inline in a 2xx response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiError {
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    /// Providers send this as a string, a number, or null
    #[serde(default)]
    pub code: Option<serde_json::Value>,

    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiError {
    /// Render `code` as plain text
    pub fn code_text(&self) -> String {
        match &self.code {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Non-empty `detail`, if any
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref().filter(|d| !d.is_empty())
    }

    /// Non-empty `message`, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Whether `detail` or `message` says the model can't take images
    pub fn is_image_unsupported(&self) -> bool {
        [self.detail(), self.message()]
            .into_iter()
            .flatten()
            .any(|text| text.contains(crate::error::IMAGE_UNSUPPORTED_MARKER))
    }

    /// Short summary used for non-2xx responses: `detail` when present,
    /// otherwise type, message and code
    pub fn summary(&self) -> String {
        match self.detail() {
            Some(detail) => detail.to_string(),
            None => format!(
                "Type: {}, Message: {}, Code: {}",
                self.error_type.as_deref().unwrap_or_default(),
                self.message.as_deref().unwrap_or_default(),
                self.code_text()
            ),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Message: {}, Code: {}, Detail: {}",
            self.error_type.as_deref().unwrap_or_default(),
            self.message.as_deref().unwrap_or_default(),
            self.code_text(),
            self.detail.as_deref().unwrap_or_default()
        )
    }
}

/// Error body of a non-2xx response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

/// Message inside a non-streaming choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// A choice in the completion response
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
}

/// Non-streaming chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

impl ChatResponse {
    /// Content of the first choice, if it is non-empty
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}
