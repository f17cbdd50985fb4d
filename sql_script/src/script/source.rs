//! Script sources
//!
//! A script source names a script for diagnostics and hands out a reader over
//! its UTF-8 text.

use async_trait::async_trait;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

/// Reader handed out by a [`ScriptSource`]
pub type ScriptReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Where the text of a SQL script comes from
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Human readable identifier used in logs and errors
    fn description(&self) -> String;

    /// Open the script for reading. Called once per execution.
    async fn open(&self) -> std::io::Result<ScriptReader>;
}

/// A script stored in a file
#[derive(Debug, Clone)]
pub struct FileScript {
    path: PathBuf,
}

impl FileScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScriptSource for FileScript {
    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }

    async fn open(&self) -> std::io::Result<ScriptReader> {
        let file = File::open(&self.path).await?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A script held in memory
#[derive(Debug, Clone)]
pub struct InlineScript {
    name: String,
    content: Vec<u8>,
}

impl InlineScript {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: text.into().into_bytes(),
        }
    }

    /// Raw bytes, decoded as UTF-8 when the script is read
    pub fn from_bytes(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

#[async_trait]
impl ScriptSource for InlineScript {
    fn description(&self) -> String {
        format!("inline script [{}]", self.name)
    }

    async fn open(&self) -> std::io::Result<ScriptReader> {
        Ok(Box::new(Cursor::new(self.content.clone())))
    }
}

#[async_trait]
impl<S: ScriptSource + ?Sized> ScriptSource for Box<S> {
    fn description(&self) -> String {
        (**self).description()
    }

    async fn open(&self) -> std::io::Result<ScriptReader> {
        (**self).open().await
    }
}
