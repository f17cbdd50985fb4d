//! Database module for sql_script
//!
//! This module handles connections and the ordered execution of statements.

pub mod connection;
pub mod executor;
pub mod populator;

// Re-export key types
pub use connection::{DatabaseConnection, PooledConnection, ScriptConnection};
pub use executor::{execute_statements, ExecutionSummary, ScriptExecutor};
pub use populator::DatabasePopulator;
