//! Mutating filesystem operations.
//!
//! Paths arrive pre-resolved by the caller (the HTTP handlers run them
//! through the [`Workdir`](crate::fs::Workdir) resolver first). Each
//! operation is a single filesystem action executed on the blocking pool.

use std::path::{Path, PathBuf};

use crate::fs::error::{map_io_error, FsError};

/// Create a directory at `abs`.
///
/// An existing node at the path, file or directory alike, is an
/// [`FsError::AlreadyExists`]; creation is not idempotent.
pub async fn create_folder(abs: PathBuf) -> Result<(), FsError> {
    tokio::task::spawn_blocking(move || {
        std::fs::create_dir(&abs).map_err(|e| map_io_error(e, &abs))
    })
    .await
    .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

/// Rename the node at `abs` to `new_name` within its parent directory.
///
/// `new_name` must be a bare name: no separators, not empty, not `.` or
/// `..`. An occupied destination name is an error.
pub async fn rename(abs: PathBuf, new_name: String) -> Result<(), FsError> {
    validate_bare_name(&new_name)?;
    tokio::task::spawn_blocking(move || rename_sync(&abs, &new_name))
        .await
        .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

fn rename_sync(abs: &Path, name: &str) -> Result<(), FsError> {
    let parent = abs
        .parent()
        .ok_or_else(|| FsError::InvalidName("path has no parent".to_string()))?;
    let dst = parent.join(name);
    if dst.symlink_metadata().is_ok() {
        return Err(FsError::AlreadyExists(dst.display().to_string()));
    }
    std::fs::rename(abs, &dst).map_err(|e| map_io_error(e, abs))
}

/// Remove the node at `abs`; directories are removed recursively.
pub async fn delete(abs: PathBuf) -> Result<(), FsError> {
    tokio::task::spawn_blocking(move || {
        let meta = std::fs::symlink_metadata(&abs).map_err(|e| map_io_error(e, &abs))?;
        if meta.is_dir() {
            std::fs::remove_dir_all(&abs).map_err(|e| map_io_error(e, &abs))
        } else {
            std::fs::remove_file(&abs).map_err(|e| map_io_error(e, &abs))
        }
    })
    .await
    .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

/// Move the node at `src` to the full destination path `dst`.
///
/// An occupied destination is an error, as is a destination inside the
/// source; both paths live under the same root, so this is a single
/// `rename` call.
pub async fn move_entry(src: PathBuf, dst: PathBuf) -> Result<(), FsError> {
    tokio::task::spawn_blocking(move || {
        if dst.starts_with(&src) {
            return Err(FsError::InvalidName(
                "destination lies inside the source".to_string(),
            ));
        }
        if dst.symlink_metadata().is_ok() {
            return Err(FsError::AlreadyExists(dst.display().to_string()));
        }
        std::fs::rename(&src, &dst).map_err(|e| map_io_error(e, &src))
    })
    .await
    .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

/// Copy the node at `src` to `dst`, recursively for directories. The
/// source is left unchanged; an occupied destination is an error.
pub async fn copy_entry(src: PathBuf, dst: PathBuf) -> Result<(), FsError> {
    tokio::task::spawn_blocking(move || {
        if dst.starts_with(&src) {
            return Err(FsError::InvalidName(
                "destination lies inside the source".to_string(),
            ));
        }
        if dst.symlink_metadata().is_ok() {
            return Err(FsError::AlreadyExists(dst.display().to_string()));
        }
        copy_sync(&src, &dst)
    })
    .await
    .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

fn copy_sync(src: &Path, dst: &Path) -> Result<(), FsError> {
    let meta = std::fs::metadata(src).map_err(|e| map_io_error(e, src))?;
    if meta.is_dir() {
        std::fs::create_dir(dst).map_err(|e| map_io_error(e, dst))?;
        for entry in std::fs::read_dir(src).map_err(|e| map_io_error(e, src))? {
            let entry = entry.map_err(|e| map_io_error(e, src))?;
            copy_sync(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        std::fs::copy(src, dst)
            .map(|_| ())
            .map_err(|e| map_io_error(e, src))
    }
}

fn validate_bare_name(name: &str) -> Result<(), FsError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}
