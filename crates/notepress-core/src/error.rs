//! Error types for the note content engine.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! Callers that need to branch on the failure class (an HTTP layer mapping
//! to status codes, the CLI mapping to exit codes) use [`Error::kind`].

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all engine operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Note or file absent
    #[error("Not found: {key}")]
    NotFound { key: String },

    /// Empty identifier, bad search parameters, etc.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Path traversal attempt detected
    #[error("Path traversal detected: {path}")]
    PathTraversalAttempt { path: PathBuf },

    /// YAML block present but unterminated, unparsable or not a mapping
    #[error("Malformed frontmatter: {reason}")]
    MalformedFrontmatter { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure classes exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    MalformedFrontmatter,
    IoFailure,
    Internal,
}

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Error::PathTraversalAttempt { path: path.into() }
    }

    /// Create a malformed frontmatter error
    pub fn malformed_frontmatter(reason: impl Into<String>) -> Self {
        Error::MalformedFrontmatter {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(err) if err.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::IoFailure,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidArgument { .. } | Error::PathTraversalAttempt { .. } => {
                ErrorKind::InvalidArgument
            }
            Error::MalformedFrontmatter { .. } => ErrorKind::MalformedFrontmatter,
            Error::ConfigError { .. } | Error::Other(_) => ErrorKind::Internal,
        }
    }
}
