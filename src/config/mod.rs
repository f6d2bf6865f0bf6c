//! Configuration Module
//!
//! Loads settings from the environment once at startup.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    Config, Prompt, PromptMode, DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_PROMPT_PREFIX,
    SYSTEM_PROMPT,
};
