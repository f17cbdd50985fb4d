//! Logging utilities for sql_script
//!
//! This module provides logging setup and configuration.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Parse a level name, defaulting to INFO for anything unknown
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging based on configuration
pub fn init_logging(config: &Option<LoggingConfig>) -> Result<()> {
    let config = match config {
        Some(cfg) => cfg,
        None => return Ok(()), // No logging configuration, use defaults
    };

    let level = parse_level(&config.level);
    let directive = format!("sql_script={}", level)
        .parse()
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;
    let env_filter = EnvFilter::from_default_env().add_directive(directive);

    // A log file wins over stdout
    let writer = if let Some(file_path) = &config.file {
        if let Some(parent) = Path::new(file_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        BoxMakeWriter::new(Mutex::new(File::create(file_path)?))
    } else if config.stdout {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        return Ok(());
    };

    let installed = if config.format.to_lowercase() == "json" {
        let subscriber = fmt::Subscriber::builder()
            .json()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    installed.map_err(|e| Error::Config(format!("Failed to install log subscriber: {}", e)))
}
