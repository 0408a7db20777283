use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::git::error_handling::GraphError;

/// Where raw log text comes from.
///
/// Retrieval is the only I/O-bound step of a rebuild and may take a while
/// (a subprocess, a file, a pipe), so it is asynchronous. Everything after it
/// is a synchronous transformation.
pub trait LogSource: Send + Sync {
    fn fetch_log(&self) -> BoxFuture<'_, Result<String, GraphError>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String {
        "log source".to_string()
    }
}

/// Log text already held in memory
#[derive(Debug, Clone)]
pub struct StaticLog {
    text: String,
}

impl StaticLog {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl LogSource for StaticLog {
    fn fetch_log(&self) -> BoxFuture<'_, Result<String, GraphError>> {
        Box::pin(async move { Ok(self.text.clone()) })
    }

    fn describe(&self) -> String {
        format!("in-memory log ({} bytes)", self.text.len())
    }
}

/// Log dump stored in a file
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LogSource for FileLog {
    fn fetch_log(&self) -> BoxFuture<'_, Result<String, GraphError>> {
        Box::pin(async move {
            debug!("Reading commit log from {:?}", self.path);
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| GraphError::source(format!("{}: {}", self.path.display(), e)))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Log piped into the process on standard input
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinLog;

impl LogSource for StdinLog {
    fn fetch_log(&self) -> BoxFuture<'_, Result<String, GraphError>> {
        Box::pin(async move {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| GraphError::source(format!("stdin: {}", e)))?;
            Ok(text)
        })
    }

    fn describe(&self) -> String {
        "stdin".to_string()
    }
}
