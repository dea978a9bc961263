//! Shared error types for covstat.
//!
//! Reader and orchestration failures surface as [`Error`]. The aggregation
//! step itself never fails, so nothing in [`crate::coverage`] returns a
//! `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for covstat operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed line in a profile or summary
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The statement profile could not be read
    #[error("couldn't parse cover profile: {0}")]
    CoverProfile(#[source] Box<Error>),

    /// The function summary could not be read
    #[error("couldn't parse func profile: {0}")]
    FuncProfile(#[source] Box<Error>),

    /// `go tool cover` could not be run or exited unsuccessfully
    #[error("couldn't get function coverage: {message}")]
    GoTool { message: String },

    /// Malformed test event
    #[error("invalid test event at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn go_tool(message: impl Into<String>) -> Self {
        Self::GoTool {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
