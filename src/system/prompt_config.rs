// src/system/prompt_config.rs

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, FALSY_ENV_VALUES, PROMPT_AUTO_ENV};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// A config file that could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unknown keys.
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Process-wide prompting policy, fixed when a parser is constructed.
///
/// ```toml
/// # ~/.config/argprompt/config.toml
/// non_interactive = false
/// suppress_prompt_if_default_given = true
/// validate_supplied_choices = false
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Never prompt. Every argument behaves like a plain clap argument.
    pub non_interactive: bool,
    /// Arguments declared with a default are not intercepted at all, instead
    /// of prompting with the default as the fallback answer.
    pub suppress_prompt_if_default_given: bool,
    /// Also reject command-line values that are not among the declared choices.
    /// Off by default: choices only constrain interactive answers.
    pub validate_supplied_choices: bool,
}

impl PromptConfig {
    /// Defaults plus the [`PROMPT_AUTO_ENV`] toggle from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Applies environment toggles read through `lookup`. The toggle can only
    /// turn prompting off, never back on.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(PROMPT_AUTO_ENV).is_some_and(|value| is_truthy(&value)) {
            log::debug!("{} is set, prompting is disabled.", PROMPT_AUTO_ENV);
            self.non_interactive = true;
        }
        self
    }

    /// Parses config file content.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads a config file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// `<config dir>/argprompt/config.toml`, if the platform has a config dir.
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
    }

    /// The user's config file (when present) with the environment applied on top.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match Self::config_file_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading prompt config from '{}'.", path.display());
                Self::load_from(&path)?
            }
            _ => Self::default(),
        };
        Ok(base.with_env_overrides(|key| env::var(key).ok()))
    }
}

/// Any non-empty value except `0`, `false`, `no` and `off` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !FALSY_ENV_VALUES
            .iter()
            .any(|falsy| value.eq_ignore_ascii_case(falsy))
}
