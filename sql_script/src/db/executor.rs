//! Statement executor
//!
//! Runs split statements one after another against a [`ScriptConnection`],
//! applying the configured failure policy.

use futures::TryStreamExt;

use crate::config::ScriptConfig;
use crate::db::connection::ScriptConnection;
use crate::error::{statement_failed_message, BoxDynError, Error, Result};
use crate::script::source::ScriptSource;

/// What happened while executing a list of statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Statements that completed successfully
    pub succeeded: usize,
    /// Statements that failed but were skipped per policy
    pub tolerated_failures: usize,
    /// Rows affected, summed over all successful statements
    pub rows_affected: u64,
}

/// Whether a statement is a `DROP`, for `ignore_failed_drops`
pub fn is_drop_statement(statement: &str) -> bool {
    statement
        .trim()
        .get(..4)
        .map_or(false, |keyword| keyword.eq_ignore_ascii_case("drop"))
}

/// Execute `statements` in order.
///
/// Statement *n + 1* is only submitted once statement *n* has completed or
/// its failure has been tolerated. A failure that is not tolerated stops the
/// run and is returned as [`Error::StatementFailed`] carrying the 1-based
/// statement number.
pub async fn execute_statements<C>(
    connection: &mut C,
    statements: &[String],
    resource: &str,
    config: &ScriptConfig,
) -> Result<ExecutionSummary>
where
    C: ScriptConnection + ?Sized,
{
    let mut summary = ExecutionSummary::default();

    for (i, statement) in statements.iter().enumerate() {
        let statement_number = i + 1;

        match run_statement(connection, statement).await {
            Ok(rows_affected) => {
                tracing::debug!(
                    statement_number,
                    rows_affected,
                    sql = statement.as_str(),
                    "Statement executed"
                );
                summary.succeeded += 1;
                summary.rows_affected += rows_affected;
            }
            Err(cause) => {
                let tolerated = config.continue_on_error
                    || (config.ignore_failed_drops && is_drop_statement(statement));

                if !tolerated {
                    return Err(Error::StatementFailed {
                        index: statement_number,
                        statement: statement.clone(),
                        resource: resource.to_string(),
                        cause,
                    });
                }

                tracing::debug!(
                    error = %cause,
                    "{}",
                    statement_failed_message(statement, statement_number, resource)
                );
                summary.tolerated_failures += 1;
            }
        }
    }

    Ok(summary)
}

/// Run one statement and sum the rows affected over all its result segments
async fn run_statement<C>(connection: &mut C, statement: &str) -> std::result::Result<u64, BoxDynError>
where
    C: ScriptConnection + ?Sized,
{
    connection
        .execute(statement)
        .try_fold(0u64, |total, rows| async move { Ok(total + rows) })
        .await
}

/// Runs scripts against one connection with fixed settings
pub struct ScriptExecutor<C> {
    connection: C,
    config: ScriptConfig,
}

impl<C: ScriptConnection> ScriptExecutor<C> {
    /// Create a new script executor
    pub fn new(connection: C, config: ScriptConfig) -> Self {
        Self { connection, config }
    }

    /// Read, split and execute one script
    pub async fn run_script<S>(&mut self, source: &S) -> Result<()>
    where
        S: ScriptSource + ?Sized,
    {
        crate::execute_sql_script(&mut self.connection, source, &self.config).await
    }

    /// Execute already split statements in order
    pub async fn execute_batch(&mut self, statements: &[String]) -> Result<ExecutionSummary> {
        execute_statements(&mut self.connection, statements, "statement batch", &self.config).await
    }

    /// Get the settings used for every script
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Get database connection
    pub fn get_connection(&self) -> &C {
        &self.connection
    }

    /// Give the connection back to the caller
    pub fn into_inner(self) -> C {
        self.connection
    }
}
