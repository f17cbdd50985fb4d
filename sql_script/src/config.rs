//! Configuration handling for sql_script

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};
use crate::script::{
    DEFAULT_BLOCK_COMMENT_END_DELIMITER, DEFAULT_BLOCK_COMMENT_START_DELIMITER,
    DEFAULT_COMMENT_PREFIX,
};

/// Load populator configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<PopulatorConfig> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

    let config: PopulatorConfig = toml::from_str(&config_str)?;

    config.script.validate()?;
    Ok(config)
}

/// Settings for a database population run: which scripts, how to split
/// and execute them, and optionally where to connect
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PopulatorConfig {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub script: ScriptConfig,
    /// Script paths or glob patterns, executed in the listed order
    #[serde(default)]
    pub scripts: Vec<String>,
    pub logging: Option<LoggingConfig>,
}

/// How a single script is split into statements and how failures are handled
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScriptConfig {
    pub comment_prefix: String,
    pub block_comment_start: String,
    pub block_comment_end: String,
    /// `None` resolves to `;`, falling back to a newline when the script
    /// contains no `;` outside quotes
    pub separator: Option<String>,
    pub continue_on_error: bool,
    pub ignore_failed_drops: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
            block_comment_start: DEFAULT_BLOCK_COMMENT_START_DELIMITER.to_string(),
            block_comment_end: DEFAULT_BLOCK_COMMENT_END_DELIMITER.to_string(),
            separator: None,
            continue_on_error: false,
            ignore_failed_drops: false,
        }
    }
}

impl ScriptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    pub fn with_block_comment_delimiters(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.block_comment_start = start.into();
        self.block_comment_end = end.into();
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn with_ignore_failed_drops(mut self, ignore_failed_drops: bool) -> Self {
        self.ignore_failed_drops = ignore_failed_drops;
        self
    }

    /// Reject empty comment delimiters
    pub fn validate(&self) -> Result<()> {
        if self.comment_prefix.trim().is_empty() {
            return Err(Error::Config("'comment_prefix' must not be empty".to_string()));
        }
        if self.block_comment_start.trim().is_empty() {
            return Err(Error::Config(
                "'block_comment_start' must not be empty".to_string(),
            ));
        }
        if self.block_comment_end.trim().is_empty() {
            return Err(Error::Config("'block_comment_end' must not be empty".to_string()));
        }
        if matches!(&self.separator, Some(separator) if separator.is_empty()) {
            return Err(Error::Config("'separator' must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub driver: String,
    pub url: String,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}
