//! HTTP Client
//!
//! Sends one chat completion request and decodes whichever body shape the
//! server chooses to answer with.

use crate::api::{ChatMessage, ChatRequest};
use crate::client::response::{
    collect_event_stream, decode_json_body, status_error, Completion, ResponseShape,
};
use crate::error::{CmdHelperError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Overall timeout for one exchange, connect and body read included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// HTTP client for the chat completion endpoint
pub struct HttpClient {
    /// Inner reqwest client
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given overall timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CmdHelperError::RequestConstruction(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    fn headers(api_token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_BOTH));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_token)).map_err(|e| {
                CmdHelperError::RequestConstruction(format!("Invalid API token format: {}", e))
            })?,
        );
        Ok(headers)
    }

    /// Send a chat completion request.
    ///
    /// Streaming is always requested; the response `Content-Type` decides
    /// how the body is read.
    pub async fn send_chat(
        &self,
        url: &str,
        api_token: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion> {
        let headers = Self::headers(api_token)?;
        let body = serde_json::to_vec(&ChatRequest::new(model, messages)).map_err(|e| {
            CmdHelperError::RequestConstruction(format!("Failed to encode request: {}", e))
        })?;

        debug!(url, model, messages = messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return match response.text().await {
                Ok(body) => Err(status_error(status.as_u16(), &body)),
                Err(e) => Err(CmdHelperError::ApiStatus {
                    status: status.as_u16(),
                    message: format!("failed to read error body: {}", e),
                }),
            };
        }

        let shape = ResponseShape::from_headers(response.headers());
        debug!(?shape, status = status.as_u16(), "Received response");

        match shape {
            ResponseShape::EventStream => collect_event_stream(response.bytes_stream()).await,
            ResponseShape::Json => {
                let body = response.text().await?;
                decode_json_body(&body).map(Completion::Full)
            }
            ResponseShape::Other(content_type) => {
                let body = response.text().await.unwrap_or_default();
                Err(CmdHelperError::UnexpectedContentType { content_type, body })
            }
        }
    }
}
