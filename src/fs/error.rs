//! Error taxonomy for the filesystem engine.

use std::path::Path;

use thiserror::Error;

/// Errors produced by path resolution, listing, mutations, and uploads.
///
/// The HTTP layer maps each variant to a status code; nothing below the
/// boundary knows about HTTP.
#[derive(Error, Debug)]
pub enum FsError {
    /// The resolved path falls outside the working directory.
    #[error("Path escapes the working directory: {0}")]
    PathEscape(String),

    /// The requested file or directory was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The destination already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Permission was denied for the requested operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A client-supplied name is not usable as a bare file name.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A filesystem operation failed (I/O error, blocking-task failure).
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Map `std::io::Error` to `FsError` based on error kind.
pub(crate) fn map_io_error(e: std::io::Error, path: &Path) -> FsError {
    let path = path.display().to_string();
    match e.kind() {
        std::io::ErrorKind::NotFound => FsError::NotFound(path),
        std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
        std::io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
        _ => FsError::OperationFailed(format!("{}: {}", path, e)),
    }
}
