//! Error types for the YANG context runtime.

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Machine-checkable classification of a failure.
///
/// Callers branch on the kind instead of matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was missing or out of range.
    InvalidArgument,
    /// Allocation failed at a growth point.
    OutOfMemory,
    /// Filesystem permission or path resolution failure.
    SystemAccess,
    /// A process-wide resource stayed unavailable after bounded retries.
    ResourceExhaustion,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::SystemAccess => "system access",
            ErrorKind::ResourceExhaustion => "resource exhaustion",
        };
        f.write_str(name)
    }
}

/// Context-related errors
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Memory allocation failed: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Unable to use search directory \"{}\" ({source})", .path.display())]
    SearchDirAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path canonicalization failed for \"{}\" ({source})", .path.display())]
    Canonicalize {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Thread-specific error key unavailable after {attempts} attempts")]
    KeyExhausted { attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ContextError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContextError::InvalidArgument(_) | ContextError::Config(_) => ErrorKind::InvalidArgument,
            ContextError::OutOfMemory(_) => ErrorKind::OutOfMemory,
            ContextError::SearchDirAccess { .. } | ContextError::Canonicalize { .. } => {
                ErrorKind::SystemAccess
            }
            ContextError::KeyExhausted { .. } => ErrorKind::ResourceExhaustion,
        }
    }

    /// Filesystem path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ContextError::SearchDirAccess { path, .. } | ContextError::Canonicalize { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ContextError {
    fn from(err: config::ConfigError) -> Self {
        ContextError::Config(err.to_string())
    }
}
