use std::io;
use std::path::Path;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors that don't map to a more specific kind.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The OS refused access to the path.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A directory operation was attempted on something else.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Non-recursive removal of a directory that still has children.
    #[error("Directory not empty: {0}")]
    NotEmpty(String),

    /// Creation target is already taken.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The requested entry can't be acted on (empty listing, bad name, ...).
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// External editor could not be started or exited unsuccessfully.
    #[error("Editor error: {0}")]
    Editor(String),
}

impl AppError {
    /// Classify an I/O error against the path it was raised for.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(shown),
            io::ErrorKind::PermissionDenied => AppError::PermissionDenied(shown),
            io::ErrorKind::NotADirectory => AppError::NotADirectory(shown),
            io::ErrorKind::DirectoryNotEmpty => AppError::NotEmpty(shown),
            io::ErrorKind::AlreadyExists => AppError::AlreadyExists(shown),
            _ => AppError::Io(err),
        }
    }
}
