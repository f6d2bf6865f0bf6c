//! Streaming Support
//!
//! Parses Server-Sent Events (SSE) lines of a streamed chat completion and
//! accumulates their content deltas.

use crate::error::{CmdHelperError, Result};
use serde::Deserialize;

/// A streaming chunk from the API
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    /// Choices with deltas
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// A choice in a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    /// The delta (partial message)
    #[serde(default)]
    pub delta: StreamDelta,
}

/// Delta content in a streaming chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// Content delta of the first choice, if non-empty
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// One decoded line of an event stream
#[derive(Debug)]
pub enum SseLine {
    /// A `data:` line carrying a chunk
    Chunk(StreamChunk),

    /// `data: [DONE]`
    Done,

    /// Blank data, comments, `event:`/`id:` lines and anything else
    Ignored,
}

/// Parse one SSE line.
///
/// Only lines starting with `data:` are considered; the payload is trimmed
/// before use. A payload that is not valid chunk JSON is an error.
pub fn parse_sse_line(line: &str) -> Result<SseLine> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Ignored);
    };

    let data = data.trim();
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }
    if data.is_empty() {
        return Ok(SseLine::Ignored);
    }

    serde_json::from_str(data)
        .map(SseLine::Chunk)
        .map_err(|e| CmdHelperError::JsonParse {
            message: format!("Failed to parse SSE chunk: {}", e),
            body: data.to_string(),
        })
}

/// Accumulator for streamed content
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    done: bool,
    skipped: usize,
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line. Returns `false` once `[DONE]` has been seen.
    pub fn push_line(&mut self, line: &str) -> bool {
        if self.done {
            return false;
        }

        match parse_sse_line(line) {
            Ok(SseLine::Chunk(chunk)) => {
                if let Some(delta) = chunk.delta_content() {
                    self.content.push_str(delta);
                }
            }
            Ok(SseLine::Done) => self.done = true,
            Ok(SseLine::Ignored) => {}
            Err(e) => {
                tracing::warn!("Skipping stream chunk: {}", e);
                self.skipped += 1;
            }
        }

        !self.done
    }

    /// Text accumulated so far
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of malformed chunks skipped
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Take the accumulated text
    pub fn into_content(self) -> String {
        self.content
    }
}
