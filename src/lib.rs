//! llm-cmd-helper - fix a shell command with an LLM
//!
//! Sends a mistyped command to an OpenAI-compatible chat completion
//! endpoint and returns the corrected command, ready to be dropped back
//! into the shell's input line.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;

use api::ChatMessage;
use client::{Completion, HttpClient};
use config::{Config, SYSTEM_PROMPT};
use error::Result;
use tracing::{debug, warn};

/// Turns a command into its corrected form
pub struct CommandFixer {
    /// Settings resolved at startup
    config: Config,

    /// HTTP client
    http_client: HttpClient,
}

impl CommandFixer {
    /// Create a fixer from a resolved config
    pub fn new(config: Config) -> Result<Self> {
        let http_client = HttpClient::new(config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// System message followed by the prompt prefix and the command
    pub fn messages_for(&self, command: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("{}{}", self.config.prompt.prefix, command)),
        ]
    }

    /// Ask the model for raw output, keeping a partial stream as-is
    pub async fn request(&self, command: &str) -> Result<Completion> {
        let messages = self.messages_for(command);
        self.http_client
            .send_chat(
                &self.config.api_url,
                &self.config.api_token,
                &self.config.model,
                &messages,
            )
            .await
    }

    /// Ask the model to fix `command` and normalize its answer.
    ///
    /// A stream that breaks midway counts as a failure; the partial text
    /// is only logged.
    pub async fn fix(&self, command: &str) -> Result<String> {
        let completion = self.request(command).await?;
        if completion.is_partial() {
            let text = completion.text();
            warn!(received = text.len(), "Discarding partial answer: {:?}", text);
        }

        let raw = completion.into_result()?;
        debug!(raw = %raw, "Model answer");
        Ok(normalize::normalize(&raw, self.config.prompt.mode))
    }
}
