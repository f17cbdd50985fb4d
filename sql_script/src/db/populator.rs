//! Database populator
//!
//! Runs a list of scripts, in order, against one connection with shared
//! settings. Typical use is schema setup and teardown around tests.

use std::path::PathBuf;

use crate::config::{PopulatorConfig, ScriptConfig};
use crate::db::connection::ScriptConnection;
use crate::error::{Error, Result};
use crate::script::source::{FileScript, ScriptSource};

/// Populates (or cleans up) a database by executing scripts
pub struct DatabasePopulator {
    scripts: Vec<Box<dyn ScriptSource>>,
    config: ScriptConfig,
}

impl DatabasePopulator {
    /// Create an empty populator
    pub fn new(config: ScriptConfig) -> Self {
        Self {
            scripts: Vec::new(),
            config,
        }
    }

    /// Build a populator from configuration, expanding every script pattern
    /// into the files it matches (sorted by path)
    pub fn from_config(config: &PopulatorConfig) -> Result<Self> {
        config.script.validate()?;

        let mut populator = Self::new(config.script.clone());
        for pattern in &config.scripts {
            for path in expand_pattern(pattern)? {
                populator.add_script(FileScript::new(path));
            }
        }

        Ok(populator)
    }

    /// Append a script to run after the ones already added
    pub fn add_script(&mut self, script: impl ScriptSource + 'static) -> &mut Self {
        self.scripts.push(Box::new(script));
        self
    }

    /// Append several scripts, keeping their order
    pub fn add_scripts<I, S>(&mut self, scripts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: ScriptSource + 'static,
    {
        for script in scripts {
            self.add_script(script);
        }
        self
    }

    /// Number of scripts that will run
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Descriptions of the scripts, in execution order
    pub fn script_descriptions(&self) -> Vec<String> {
        self.scripts.iter().map(|s| s.description()).collect()
    }

    /// Execute every script in order, stopping at the first fatal error
    pub async fn populate<C>(&self, connection: &mut C) -> Result<()>
    where
        C: ScriptConnection + ?Sized,
    {
        for (i, script) in self.scripts.iter().enumerate() {
            tracing::info!(
                script_number = i + 1,
                source = %script.description(),
                "Executing SQL script"
            );

            crate::execute_sql_script(&mut *connection, &**script, &self.config).await?;
        }

        Ok(())
    }
}

/// Expand a path or glob pattern. A pattern matching no file is an error so
/// that a typo never silently skips a script.
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern)
        .map_err(|e| Error::Config(format!("Invalid script pattern '{}': {}", pattern, e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(Error::Config(format!("No SQL script matches '{}'", pattern)));
    }

    paths.sort();
    Ok(paths)
}
