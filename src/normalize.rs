//! Response Normalization
//!
//! Turns raw model output into something a shell can take as a command.

use crate::config::PromptMode;
use once_cell::sync::Lazy;
use regex::Regex;

/// `<think ...>...</think>` blocks emitted by reasoning models
static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<think[^>]*>.*?</think>").expect("Invalid regex"));

/// Remove every `<think>` region
pub fn strip_think(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").into_owned()
}

/// Clean up model output according to the prompt mode.
///
/// With the built-in prompt the answer is forced onto one line and code
/// fences and the `bash` language tag are dropped. With a custom prompt
/// only `<think>` blocks are removed and a single leading space is added.
pub fn normalize(raw: &str, mode: PromptMode) -> String {
    let cleaned = strip_think(raw);

    match mode {
        PromptMode::Default => cleaned
            .trim()
            .replace("\r\n", " ")
            .replace('\n', " ")
            .replace('\r', " ")
            .replace("```", "")
            .replace("bash", "")
            .trim()
            .to_string(),
        PromptMode::Custom => format!(" {}", cleaned),
    }
}
