//! Error types for afmdocs

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of a file conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Reading the source file
    Read,
    /// Writing the generated file
    Write,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoOp::Read => write!(f, "read"),
            IoOp::Write => write!(f, "write"),
        }
    }
}

/// Main error type for afmdocs operations
#[derive(Error, Debug)]
pub enum AfmdocsError {
    /// A file could not be read or written during conversion
    #[error("failed to {op} {}: {source}", .path.display())]
    Processing {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blockquote nesting went deeper than the configured maximum
    #[error("nesting depth exceeds the limit of {limit}")]
    RecursionLimitExceeded { limit: usize },

    /// The configuration file does not exist
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file is not valid TOML
    #[error("configuration parse error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A required configuration key is missing
    #[error("missing required configuration key `{0}`")]
    KeyNotFound(String),

    /// A configuration key holds a value of the wrong type
    #[error("configuration key `{key}` must be {expected}")]
    InvalidValue { key: String, expected: &'static str },

    /// A file discovery pattern could not be compiled
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// IO error not tied to a single conversion
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AfmdocsError {
    /// Wrap a read failure for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AfmdocsError::Processing {
            op: IoOp::Read,
            path: path.into(),
            source,
        }
    }

    /// Wrap a write failure for `path`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AfmdocsError::Processing {
            op: IoOp::Write,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for afmdocs operations
pub type Result<T> = std::result::Result<T, AfmdocsError>;
