//! Response Decoding
//!
//! Turns an HTTP response into the text the model produced. The body shape
//! is decided once from `Content-Type` and then handled by one decoder.

use crate::api::{ChatResponse, ErrorEnvelope, StreamAccumulator};
use crate::error::{CmdHelperError, Result};
use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use std::fmt::Display;

/// How a successful response body is encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// `text/event-stream`
    EventStream,

    /// `application/json`
    Json,

    /// Anything else, with the raw header value
    Other(String),
}

impl ResponseShape {
    /// Decode the shape from a `Content-Type` value
    pub fn from_content_type(content_type: &str) -> Self {
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains("text/event-stream") {
            ResponseShape::EventStream
        } else if lowered.contains("application/json") {
            ResponseShape::Json
        } else {
            ResponseShape::Other(content_type.to_string())
        }
    }

    /// Decode the shape from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self::from_content_type(content_type)
    }
}

/// Outcome of a successful exchange
#[derive(Debug)]
pub enum Completion {
    /// The whole answer arrived
    Full(String),

    /// The stream broke after some text had been received
    Partial { text: String, error: CmdHelperError },
}

impl Completion {
    /// Text received, complete or not
    pub fn text(&self) -> &str {
        match self {
            Completion::Full(text) => text,
            Completion::Partial { text, .. } => text,
        }
    }

    /// Whether the stream was cut short
    pub fn is_partial(&self) -> bool {
        matches!(self, Completion::Partial { .. })
    }

    /// Treat a partial answer as a failure
    pub fn into_result(self) -> Result<String> {
        match self {
            Completion::Full(text) => Ok(text),
            Completion::Partial { error, .. } => Err(error),
        }
    }
}

/// Classify a non-2xx response body
pub fn status_error(status: u16, body: &str) -> CmdHelperError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
        .filter(|error| error.detail().is_some() || error.message().is_some());

    match parsed {
        Some(error) if error.is_image_unsupported() => {
            CmdHelperError::ImageUnsupported(error.summary())
        }
        Some(error) => CmdHelperError::ApiStatus {
            status,
            message: error.summary(),
        },
        None => CmdHelperError::ApiStatus {
            status,
            message: body.to_string(),
        },
    }
}

/// Decode a buffered `application/json` chat completion body
pub fn decode_json_body(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CmdHelperError::JsonParse {
            message: e.to_string(),
            body: body.to_string(),
        })?;

    if let Some(error) = response.error {
        if error.is_image_unsupported() {
            return Err(CmdHelperError::ImageUnsupported(error.to_string()));
        }
        return Err(CmdHelperError::ApiJson(error));
    }

    response
        .content()
        .map(str::to_string)
        .ok_or(CmdHelperError::EmptyResponse)
}

/// Split a byte stream into text lines.
///
/// Lines end at `\n`; a trailing `\r` is dropped. A last line without a
/// terminator is still yielded. The stream ends after the first read error.
pub fn body_lines<S, E>(byte_stream: S) -> impl Stream<Item = std::result::Result<String, E>>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
{
    stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();
        let mut failed = false;

        while let Some(chunk) = byte_stream.next().await {
            match chunk {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buffer.drain(..=pos).collect();
                        yield Ok(decode_line(&line));
                    }
                }
                Err(e) => {
                    yield Err(e);
                    failed = true;
                    break;
                }
            }
        }

        if !failed && !buffer.is_empty() {
            yield Ok(decode_line(&buffer));
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(raw);
    let line: &str = &decoded;
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line).to_string()
}

/// Read a `text/event-stream` body to the end (or `[DONE]`).
///
/// A stream that finishes without any content is an `EmptyResponse`.
pub async fn collect_event_stream<S, E>(byte_stream: S) -> Result<Completion>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Display,
{
    let lines = body_lines(byte_stream);
    futures::pin_mut!(lines);

    let mut acc = StreamAccumulator::new();
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => {
                if !acc.push_line(&line) {
                    break;
                }
            }
            Err(e) if acc.content().is_empty() => {
                return Err(CmdHelperError::StreamRead(e.to_string()));
            }
            Err(e) => {
                let error = CmdHelperError::StreamRead(format!(
                    "read failed after partial data was received: {}",
                    e
                ));
                return Ok(Completion::Partial {
                    text: acc.into_content(),
                    error,
                });
            }
        }
    }

    if acc.skipped() > 0 {
        tracing::debug!(skipped = acc.skipped(), "Stream finished with malformed chunks");
    }

    if acc.content().is_empty() {
        return Err(CmdHelperError::EmptyResponse);
    }

    Ok(Completion::Full(acc.into_content()))
}
