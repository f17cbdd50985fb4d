//! sql_script: split SQL scripts into statements and run them in order
//!
//! Scripts are read from a [`ScriptSource`], split on a separator while
//! respecting quotes, escapes and comments, and executed statement by
//! statement against a caller-owned [`ScriptConnection`].

pub mod config;
pub mod db;
pub mod error;
pub mod script;
pub mod utils;

use std::time::Instant;

// Re-export main types for easier access
pub use config::{PopulatorConfig, ScriptConfig};
pub use db::connection::{DatabaseConnection, PooledConnection, ScriptConnection};
pub use db::executor::{execute_statements, ExecutionSummary, ScriptExecutor};
pub use db::populator::DatabasePopulator;
pub use error::{Error, Result};
pub use script::source::{FileScript, InlineScript, ScriptSource};
pub use script::{
    split_sql_script, DEFAULT_BLOCK_COMMENT_END_DELIMITER, DEFAULT_BLOCK_COMMENT_START_DELIMITER,
    DEFAULT_COMMENT_PREFIX, DEFAULT_STATEMENT_SEPARATOR, EOF_STATEMENT_SEPARATOR,
    FALLBACK_STATEMENT_SEPARATOR,
};

/// Execute a SQL script with the default separator, comment delimiters and
/// failure policy
pub async fn execute_sql_script_with_defaults<C, S>(connection: &mut C, source: &S) -> Result<()>
where
    C: ScriptConnection + ?Sized,
    S: ScriptSource + ?Sized,
{
    execute_sql_script(connection, source, &ScriptConfig::default()).await
}

/// Execute the SQL script behind `source` on `connection`.
///
/// The script is read, split into statements and executed one statement at a
/// time. The connection is neither opened nor closed here. Errors other than
/// read, parse and statement failures are reported as
/// [`Error::Uncategorized`] naming the script.
pub async fn execute_sql_script<C, S>(
    connection: &mut C,
    source: &S,
    config: &ScriptConfig,
) -> Result<()>
where
    C: ScriptConnection + ?Sized,
    S: ScriptSource + ?Sized,
{
    let resource = source.description();
    tracing::debug!(source = %resource, "Executing SQL script");
    let start = Instant::now();

    match run_script(connection, source, &resource, config).await {
        Ok(summary) => {
            tracing::debug!(
                source = %resource,
                elapsed_ms = start.elapsed().as_millis() as u64,
                statements = summary.succeeded,
                tolerated_failures = summary.tolerated_failures,
                rows_affected = summary.rows_affected,
                "Executed SQL script"
            );
            Ok(())
        }
        Err(e) => Err(e.categorize(&resource)),
    }
}

async fn run_script<C, S>(
    connection: &mut C,
    source: &S,
    resource: &str,
    config: &ScriptConfig,
) -> Result<ExecutionSummary>
where
    C: ScriptConnection + ?Sized,
    S: ScriptSource + ?Sized,
{
    config.validate()?;

    let script = script::read_script_from(source, config).await?;
    // Splitting is done up front so a malformed script runs no statement at all
    let statements = script::split_statements(&script, Some(resource), config)?;

    execute_statements(connection, &statements, resource, config).await
}

/// Load a populator configuration file, set up logging, connect to the
/// configured database and run every listed script
pub async fn populate_from_file(config_path: &str) -> Result<()> {
    let config = config::load_from_file(config_path)?;
    utils::logging::init_logging(&config.logging)?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| Error::Config("No [database] section in configuration".to_string()))?;

    let populator = DatabasePopulator::from_config(&config)?;
    let pool = DatabaseConnection::connect(database).await?;
    // every script of the run shares one session
    let result = match pool.acquire().await {
        Ok(mut connection) => populator.populate(&mut connection).await,
        Err(e) => Err(e),
    };
    pool.close().await;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::executor::tests::RecordingConnection;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_execute_script_end_to_end() {
        let source = InlineScript::new(
            "init",
            "-- schema\nCREATE TABLE t (id INT, name VARCHAR(10));\n\
             /* seed data */\nINSERT INTO t VALUES (1, 'a;b');\nINSERT INTO t VALUES (2, 'it''s');",
        );
        let mut connection = RecordingConnection::default();

        execute_sql_script_with_defaults(&mut connection, &source).await.unwrap();

        assert_eq!(
            connection.executed,
            vec![
                "CREATE TABLE t (id INT, name VARCHAR(10))",
                "INSERT INTO t VALUES (1, 'a;b')",
                "INSERT INTO t VALUES (2, 'it''s')",
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_error_runs_nothing() {
        let source = InlineScript::new("broken", "CREATE TABLE t (id INT);\nSELECT 1 /* oops");
        let mut connection = RecordingConnection::default();

        let error = execute_sql_script_with_defaults(&mut connection, &source)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::ScriptParse { .. }));
        assert!(connection.executed.is_empty());
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileScript::new(dir.path().join("missing.sql"));
        let mut connection = RecordingConnection::default();

        let error = execute_sql_script_with_defaults(&mut connection, &source)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::CannotReadScript { .. }));
    }

    #[tokio::test]
    async fn test_other_errors_are_uncategorized() {
        let source = InlineScript::new("empty", "-- nothing but a comment\n");
        let mut connection = RecordingConnection::default();

        let error = execute_sql_script_with_defaults(&mut connection, &source)
            .await
            .unwrap_err();

        match error {
            Error::Uncategorized { resource, .. } => assert_eq!(resource, "inline script [empty]"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_statement_failure_names_script() {
        let source = InlineScript::new("seed", "SELECT 1;\nINSERT INTO gone VALUES (1);\nSELECT 3;");
        let mut connection = RecordingConnection::failing_on(&["gone"]);

        let error = execute_sql_script_with_defaults(&mut connection, &source)
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Failed to execute SQL script statement #2 of inline script [seed]: INSERT INTO gone VALUES (1)"
        );
        assert_eq!(connection.executed.len(), 2);
    }
}
