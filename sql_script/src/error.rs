//! Error types for sql_script

use thiserror::Error;

/// Boxed error produced by a connection while executing a statement
pub type BoxDynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for sql_script operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sql_script
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read SQL script from {resource}: {cause}")]
    CannotReadScript {
        resource: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("{}", parse_message(.message, .resource))]
    ScriptParse {
        message: String,
        resource: Option<String>,
    },

    #[error("Failed to execute SQL script statement #{index} of {resource}: {statement}")]
    StatementFailed {
        index: usize,
        statement: String,
        resource: String,
        #[source]
        cause: BoxDynError,
    },

    #[error("Failed to execute database script from {resource}")]
    Uncategorized {
        resource: String,
        #[source]
        cause: BoxDynError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Whether this error already belongs to the script error taxonomy
    /// (read, parse, statement or uncategorized failure)
    pub fn is_script_error(&self) -> bool {
        matches!(
            self,
            Error::CannotReadScript { .. }
                | Error::ScriptParse { .. }
                | Error::StatementFailed { .. }
                | Error::Uncategorized { .. }
        )
    }

    /// Wrap anything outside the script taxonomy as an uncategorized failure
    /// of the given script
    pub fn categorize(self, resource: &str) -> Error {
        if self.is_script_error() {
            self
        } else {
            Error::Uncategorized {
                resource: resource.to_string(),
                cause: Box::new(self),
            }
        }
    }

    /// 1-based index of the failed statement, if any
    pub fn statement_index(&self) -> Option<usize> {
        match self {
            Error::StatementFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Build the diagnostic message for a failed statement
pub fn statement_failed_message(statement: &str, index: usize, resource: &str) -> String {
    format!(
        "Failed to execute SQL script statement #{} of {}: {}",
        index, resource, statement
    )
}

fn parse_message(message: &str, resource: &Option<String>) -> String {
    match resource {
        Some(resource) => format!("Failed to parse SQL script from {}: {}", resource, message),
        None => format!("Failed to parse SQL script: {}", message),
    }
}

/// Convert TOML deserialization errors to configuration errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(format!("Failed to parse config file: {}", error))
    }
}
