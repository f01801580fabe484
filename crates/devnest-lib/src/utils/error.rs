// DevNest Error Types
// Shared by scanner, statistics, catalog and launcher

use std::path::{Path, PathBuf};
use thiserror::Error;

/// DevNest Error
#[derive(Error, Debug)]
pub enum DevNestError {
    /// Unknown project or IDE id
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// File system failure on a specific path
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected input (depth, empty path, malformed template, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Spawn error or non-executable target
    #[error("Failed to launch {executable}: {message}")]
    LaunchFailed { executable: String, message: String },

    /// Nothing in the catalog to launch with
    #[error("No IDE configured, add an IDE first")]
    NoIdeConfigured,

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON column encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background task panicked or was aborted
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for DevNest operations
pub type Result<T> = std::result::Result<T, DevNestError>;

/// Error codes for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    Io,
    InvalidInput,
    LaunchFailed,
    NoIdeConfigured,
    Database,
    Serialization,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Io => "IO_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::LaunchFailed => "LAUNCH_FAILED",
            ErrorCode::NoIdeConfigured => "NO_IDE_CONFIGURED",
            ErrorCode::Database => "DATABASE_ERROR",
            ErrorCode::Serialization => "SERIALIZATION_ERROR",
            ErrorCode::Internal => "INTERNAL_ERROR",
        }
    }
}

impl DevNestError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DevNestError::NotFound { .. } => ErrorCode::NotFound,
            DevNestError::Io { .. } => ErrorCode::Io,
            DevNestError::InvalidInput(_) => ErrorCode::InvalidInput,
            DevNestError::LaunchFailed { .. } => ErrorCode::LaunchFailed,
            DevNestError::NoIdeConfigured => ErrorCode::NoIdeConfigured,
            DevNestError::Database(_) => ErrorCode::Database,
            DevNestError::Serialization(_) => ErrorCode::Serialization,
            DevNestError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn project_not_found(id: impl Into<String>) -> Self {
        DevNestError::NotFound {
            kind: "Project",
            id: id.into(),
        }
    }

    pub fn ide_not_found(id: impl Into<String>) -> Self {
        DevNestError::NotFound {
            kind: "IDE",
            id: id.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DevNestError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn launch_failed(executable: impl Into<String>, message: impl Into<String>) -> Self {
        DevNestError::LaunchFailed {
            executable: executable.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DevNestError::NotFound { .. })
    }
}

impl From<tokio::task::JoinError> for DevNestError {
    fn from(err: tokio::task::JoinError) -> Self {
        DevNestError::Internal(format!("background task failed: {}", err))
    }
}

impl From<DevNestError> for String {
    fn from(err: DevNestError) -> Self {
        format!("{}: {}", err.code().as_str(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DevNestError::project_not_found("p1").code().as_str(),
            "NOT_FOUND"
        );
        assert_eq!(
            DevNestError::NoIdeConfigured.code(),
            ErrorCode::NoIdeConfigured
        );
        assert_eq!(
            DevNestError::launch_failed("code", "boom").code().as_str(),
            "LAUNCH_FAILED"
        );
    }

    #[test]
    fn test_string_conversion_carries_code_and_id() {
        let message: String = DevNestError::ide_not_found("missing-ide").into();
        assert!(message.starts_with("NOT_FOUND: "));
        assert!(message.contains("missing-ide"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = DevNestError::io(
            "/nope/root",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code(), ErrorCode::Io);
        assert!(err.to_string().contains("/nope/root"));
    }
}
