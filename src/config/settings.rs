//! Runtime Settings
//!
//! The configuration value built once at startup and handed down to the
//! client.

use crate::client::DEFAULT_TIMEOUT;
use std::time::Duration;

/// Model used when `LLM_MODEL_NAME` is unset
pub const DEFAULT_MODEL: &str = "o4-mini";

/// Endpoint used when `LLM_API_URL` is unset
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// System message sent ahead of every request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that helps fix mistakes in command-line commands.";

/// Instruction placed in front of the command unless overridden
pub const DEFAULT_PROMPT_PREFIX: &str = "Please fix the following command-line command so that \
it is syntactically correct and performs the intended action. If the command already looks \
correct, return it unchanged. If the command contains environment variables (for example $VAR \
or %VAR%), keep them. Return only the corrected command, without any explanation or additional \
text.\n\nIncorrect command: ";

/// Which prompt produced the answer, and therefore how much cleanup it gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Built-in prompt; the answer is sanitized into one command line
    Default,

    /// Caller-supplied prompt; the answer passes through mostly untouched
    Custom,
}

/// Instruction prefix plus the mode it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub prefix: String,
    pub mode: PromptMode,
}

impl Prompt {
    /// Use `custom` if given, otherwise the built-in prefix
    pub fn from_override(custom: Option<String>) -> Self {
        match custom {
            Some(prefix) => Self {
                prefix,
                mode: PromptMode::Custom,
            },
            None => Self::default(),
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PROMPT_PREFIX.to_string(),
            mode: PromptMode::Default,
        }
    }
}

/// Everything the helper needs to make its request
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat completion endpoint
    pub api_url: String,

    /// Bearer token
    pub api_token: String,

    /// Model identifier
    pub model: String,

    /// Instruction prefix and cleanup mode
    pub prompt: Prompt,

    /// Overall request timeout
    pub timeout: Duration,
}

impl Config {
    /// Config with defaults for everything but the token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            prompt: Prompt::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
