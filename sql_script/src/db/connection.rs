//! Database connection handling
//!
//! This module defines what the executor needs from a connection and provides
//! sqlx backed implementations. A script always runs on a single physical
//! connection checked out of the pool with [`DatabaseConnection::acquire`].

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use sqlx::{
    mysql::MySqlPoolOptions, pool::PoolConnection, postgres::PgPoolOptions,
    sqlite::SqlitePoolOptions, MySql, MySqlConnection, PgConnection, Pool, Postgres, Sqlite,
    SqliteConnection,
};

use crate::config::DatabaseConfig;
use crate::error::{BoxDynError, Error, Result};

/// A connection able to run one SQL statement at a time.
///
/// Executing a statement yields one item per result segment, each carrying
/// the number of rows that segment affected. Errors may surface at any
/// point of the stream.
pub trait ScriptConnection: Send {
    fn execute<'c>(&'c mut self, sql: &'c str)
        -> BoxStream<'c, std::result::Result<u64, BoxDynError>>;
}

impl<T: ScriptConnection + ?Sized> ScriptConnection for &mut T {
    fn execute<'c>(
        &'c mut self,
        sql: &'c str,
    ) -> BoxStream<'c, std::result::Result<u64, BoxDynError>> {
        (**self).execute(sql)
    }
}

// Raw sqlx connections and the pool guards wrapping them
macro_rules! impl_script_connection {
    ($($db:ty => $connection:ty),* $(,)?) => {$(
        impl ScriptConnection for $connection {
            fn execute<'c>(
                &'c mut self,
                sql: &'c str,
            ) -> BoxStream<'c, std::result::Result<u64, BoxDynError>> {
                sqlx::Executor::execute_many(self, sql)
                    .map_ok(|done| done.rows_affected())
                    .map_err(|e| Box::new(e) as BoxDynError)
                    .boxed()
            }
        }

        impl ScriptConnection for PoolConnection<$db> {
            fn execute<'c>(
                &'c mut self,
                sql: &'c str,
            ) -> BoxStream<'c, std::result::Result<u64, BoxDynError>> {
                <$connection as ScriptConnection>::execute(&mut **self, sql)
            }
        }
    )*};
}

impl_script_connection!(
    Postgres => PgConnection,
    MySql => MySqlConnection,
    Sqlite => SqliteConnection,
);

/// Enumeration of supported database types
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    Postgres(Pool<Postgres>),
    MySql(Pool<MySql>),
    Sqlite(Pool<Sqlite>),
}

/// One physical connection checked out of a [`DatabaseConnection`] pool.
/// It goes back to the pool when dropped.
pub enum PooledConnection {
    Postgres(PoolConnection<Postgres>),
    MySql(PoolConnection<MySql>),
    Sqlite(PoolConnection<Sqlite>),
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool_size = config.pool_size.unwrap_or(10);
        let timeout = std::time::Duration::from_secs(config.timeout_seconds.unwrap_or(30));

        match config.driver.as_str() {
            "postgres" => {
                let pool = PgPoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await?;

                Ok(DatabaseConnection::Postgres(pool))
            }
            "mysql" => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await?;

                Ok(DatabaseConnection::MySql(pool))
            }
            "sqlite" => {
                let pool = SqlitePoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await?;

                Ok(DatabaseConnection::Sqlite(pool))
            }
            _ => Err(Error::Config(format!(
                "Unsupported database driver: {}",
                config.driver
            ))),
        }
    }

    /// Check out a single connection. Every statement executed through it
    /// shares its session state (temporary tables, transactions, settings).
    pub async fn acquire(&self) -> Result<PooledConnection> {
        let connection = match self {
            DatabaseConnection::Postgres(pool) => PooledConnection::Postgres(pool.acquire().await?),
            DatabaseConnection::MySql(pool) => PooledConnection::MySql(pool.acquire().await?),
            DatabaseConnection::Sqlite(pool) => PooledConnection::Sqlite(pool.acquire().await?),
        };

        Ok(connection)
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        match self {
            DatabaseConnection::Postgres(pool) => pool.close().await,
            DatabaseConnection::MySql(pool) => pool.close().await,
            DatabaseConnection::Sqlite(pool) => pool.close().await,
        }
    }
}

impl ScriptConnection for PooledConnection {
    fn execute<'c>(
        &'c mut self,
        sql: &'c str,
    ) -> BoxStream<'c, std::result::Result<u64, BoxDynError>> {
        match self {
            PooledConnection::Postgres(connection) => {
                <PoolConnection<Postgres> as ScriptConnection>::execute(connection, sql)
            }
            PooledConnection::MySql(connection) => {
                <PoolConnection<MySql> as ScriptConnection>::execute(connection, sql)
            }
            PooledConnection::Sqlite(connection) => {
                <PoolConnection<Sqlite> as ScriptConnection>::execute(connection, sql)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn sqlite(pool_size: u32) -> DatabaseConnection {
        DatabaseConnection::connect(&DatabaseConfig {
            driver: "sqlite".to_string(),
            url: "sqlite::memory:".to_string(),
            pool_size: Some(pool_size),
            timeout_seconds: Some(5),
        })
        .await
        .unwrap()
    }

    async fn rows(connection: &mut PooledConnection, sql: &str) -> Vec<u64> {
        connection.execute(sql).try_collect().await.unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_reports_rows_affected() {
        let pool = sqlite(1).await;
        let mut connection = pool.acquire().await.unwrap();

        rows(&mut connection, "CREATE TABLE t (id INTEGER)").await;
        let inserted = rows(&mut connection, "INSERT INTO t VALUES (1), (2), (3)").await;

        assert_eq!(inserted.iter().sum::<u64>(), 3);
    }

    #[tokio::test]
    async fn test_sqlite_failure_surfaces_in_stream() {
        let pool = sqlite(1).await;
        let mut connection = pool.acquire().await.unwrap();

        let result: std::result::Result<Vec<u64>, _> =
            connection.execute("INSERT INTO missing VALUES (1)").try_collect().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_acquired_connection_keeps_session_state() {
        let pool = sqlite(2).await;
        // park two distinct in-memory connections in the pool
        let first = pool.acquire().await.unwrap();
        let second = pool.acquire().await.unwrap();
        drop(first);
        drop(second);

        let mut connection = pool.acquire().await.unwrap();
        rows(&mut connection, "CREATE TEMP TABLE scratch (id INTEGER)").await;
        let inserted = rows(&mut connection, "INSERT INTO scratch VALUES (1)").await;
        let repeated = rows(&mut connection, "INSERT INTO scratch VALUES (2)").await;

        assert_eq!(inserted.iter().sum::<u64>(), 1);
        assert_eq!(repeated.iter().sum::<u64>(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_driver() {
        let result = DatabaseConnection::connect(&DatabaseConfig {
            driver: "oracle".to_string(),
            url: "oracle://localhost".to_string(),
            pool_size: None,
            timeout_seconds: None,
        })
        .await;

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
