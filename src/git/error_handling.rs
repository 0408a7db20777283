use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised while turning log text into a published layout
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Duplicate commit hash: {hash}")]
    DuplicateHash { hash: String },

    #[error("Cycle detected: commit {hash} lists {parent} as a parent but is its own ancestor")]
    CycleDetected { hash: String, parent: String },

    #[error("Rebuild {generation} superseded by a newer request")]
    Superseded { generation: u64 },

    #[error("Log source error: {reason}")]
    Source { reason: String },

    #[error("Configuration error: {setting} - {reason}")]
    Configuration { setting: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl GraphError {
    /// Create a duplicate hash error
    pub fn duplicate_hash(hash: impl Into<String>) -> Self {
        let hash = hash.into();
        error!("Duplicate commit hash in log batch: {}", hash);
        GraphError::DuplicateHash { hash }
    }

    /// Create a cycle error for the edge `hash -> parent`
    pub fn cycle(hash: impl Into<String>, parent: impl Into<String>) -> Self {
        let hash = hash.into();
        let parent = parent.into();
        error!("Commit {} closes an ancestry cycle through {}", hash, parent);
        GraphError::CycleDetected { hash, parent }
    }

    /// Create a configuration error
    pub fn configuration(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        let setting = setting.into();
        let reason = reason.into();
        warn!("Invalid configuration '{}': {}", setting, reason);
        GraphError::Configuration { setting, reason }
    }

    /// Create a log source error
    pub fn source(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("Failed to read commit log: {}", reason);
        GraphError::Source { reason }
    }

    pub fn superseded(generation: u64) -> Self {
        debug!("Discarding rebuild {}", generation);
        GraphError::Superseded { generation }
    }

    /// Duplicate or cyclic input: the history itself is inconsistent.
    pub fn is_structural(&self) -> bool {
        matches!(self, GraphError::DuplicateHash { .. } | GraphError::CycleDetected { .. })
    }

    /// Check if retrying the rebuild could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            GraphError::DuplicateHash { .. } => false,
            GraphError::CycleDetected { .. } => false,
            GraphError::Superseded { .. } => true,
            GraphError::Source { .. } => true,
            GraphError::Configuration { .. } => false,
            GraphError::Io(_) => true,
            GraphError::Serialization(_) => false,
            GraphError::Regex(_) => false,
            GraphError::Join(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GraphError::DuplicateHash { .. } => ErrorSeverity::High,
            GraphError::CycleDetected { .. } => ErrorSeverity::Critical,
            GraphError::Superseded { .. } => ErrorSeverity::Low,
            GraphError::Source { .. } => ErrorSeverity::Medium,
            GraphError::Configuration { .. } => ErrorSeverity::Medium,
            GraphError::Io(_) => ErrorSeverity::Medium,
            GraphError::Serialization(_) => ErrorSeverity::Medium,
            GraphError::Regex(_) => ErrorSeverity::Medium,
            GraphError::Join(_) => ErrorSeverity::High,
        }
    }

    /// Hash of the commit that made the history inconsistent, if any.
    pub fn offending_hash(&self) -> Option<&str> {
        match self {
            GraphError::DuplicateHash { hash } | GraphError::CycleDetected { hash, .. } => Some(hash),
            _ => None,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A malformed log line that was skipped or defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line number in the raw log.
    pub line_number: usize,
    pub line: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    /// Record dropped.
    TooFewFields { found: usize },
    /// Record dropped.
    EmptyHash,
    /// Record kept with the wall-clock time substituted.
    InvalidTimestamp { value: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::TooFewFields { found } => write!(
                f,
                "line {}: expected at least 5 fields, found {} (skipped): {:?}",
                self.line_number, found, self.line
            ),
            WarningKind::EmptyHash => {
                write!(f, "line {}: empty commit hash (skipped): {:?}", self.line_number, self.line)
            }
            WarningKind::InvalidTimestamp { value } => write!(
                f,
                "line {}: invalid timestamp {:?}, using current time: {:?}",
                self.line_number, value, self.line
            ),
        }
    }
}

/// Error reporting utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Log error with appropriate level based on severity
    pub fn log_error(error: &GraphError, context: &str) {
        match error.severity() {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {}: {}", context, error);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {}: {}", context, error);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {}: {}", context, error);
            }
            ErrorSeverity::Low => {
                debug!("[LOW] {}: {}", context, error);
            }
        }
    }

    /// Message suitable for a status bar or dialog
    pub fn user_message(error: &GraphError) -> String {
        match error {
            GraphError::DuplicateHash { hash } => format!(
                "The history contains commit {} more than once. The previous graph is still shown.",
                hash
            ),
            GraphError::CycleDetected { hash, .. } => format!(
                "The history is inconsistent: commit {} is its own ancestor. The previous graph is still shown.",
                hash
            ),
            GraphError::Superseded { .. } => "A newer refresh replaced this one.".to_string(),
            GraphError::Source { reason } => format!("Could not read the commit log: {}", reason),
            GraphError::Configuration { setting, reason } => {
                format!("Invalid setting '{}': {}", setting, reason)
            }
            other => format!("Failed to rebuild the commit graph: {}", other),
        }
    }
}
