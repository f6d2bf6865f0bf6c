//! Configuration Loader
//!
//! Reads optional dotenv files and the process environment into a
//! [`Config`]. Nothing below this module touches the environment.

use crate::config::settings::{Config, Prompt, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::error::{CmdHelperError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const ENV_API_TOKEN: &str = "LLM_API_TOKEN";
pub const ENV_MODEL_NAME: &str = "LLM_MODEL_NAME";
pub const ENV_API_URL: &str = "LLM_API_URL";
pub const ENV_PROMPT_PREFIX: &str = "LLM_CMD_HELPER_PROMPT_PREFIX";
pub const ENV_ENV_FILE: &str = "LLM_CMD_HELPER_ENV_FILE";

/// Configuration loader
pub struct ConfigLoader {
    config: Config,
}

impl ConfigLoader {
    /// Load dotenv files from default locations, then read the environment
    pub fn new() -> Result<Self> {
        for (path, explicit) in Self::get_env_paths() {
            Self::load_env_file_if_present(&path, explicit)?;
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let api_token = get(ENV_API_TOKEN).ok_or(CmdHelperError::MissingToken)?;

        let model = get(ENV_MODEL_NAME).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        info!("Query to: {}", model);

        let api_url = get(ENV_API_URL).unwrap_or_else(|| {
            warn!("{} is not set, using default: {}", ENV_API_URL, DEFAULT_API_URL);
            DEFAULT_API_URL.to_string()
        });

        let prompt = Prompt::from_override(get(ENV_PROMPT_PREFIX));

        let config = Config {
            api_url,
            api_token,
            model,
            prompt,
            ..Config::new(String::new())
        };

        Ok(Self { config })
    }

    /// Get list of dotenv paths to check, in priority order. The flag marks
    /// a path the user asked for explicitly.
    fn get_env_paths() -> Vec<(PathBuf, bool)> {
        let mut paths = Vec::new();

        // 1. Explicit file
        if let Ok(custom_path) = std::env::var(ENV_ENV_FILE) {
            if !custom_path.is_empty() {
                paths.push((PathBuf::from(custom_path), true));
            }
        }

        // 2. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push((config_dir.join("llm-cmd-helper").join("env"), false));
        }

        paths
    }

    /// Load `path` if it exists. Returns whether it was loaded.
    fn load_env_file_if_present(path: &Path, explicit: bool) -> Result<bool> {
        if path.exists() {
            Self::load_env_file(path)?;
            return Ok(true);
        }
        if explicit {
            warn!("{} points to {}, which was not found", ENV_ENV_FILE, path.display());
        }
        Ok(false)
    }

    /// Load a dotenv file without overriding variables that are already set
    fn load_env_file(path: &Path) -> Result<()> {
        dotenvy::from_path(path).map_err(|e| {
            CmdHelperError::Config(format!("Failed to load {}: {}", path.display(), e))
        })?;
        debug!("Loaded environment from {}", path.display());
        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> Config {
        self.config
    }
}
