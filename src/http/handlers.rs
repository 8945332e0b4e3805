//! Route handlers for the file API.
//!
//! Each handler resolves the client path(s) through the workdir and
//! delegates to the filesystem engine; errors bubble up as [`FsError`]
//! and are encoded by the mapping in [`crate::http::error`].

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::fs::{lister, ops, upload, Entry, FsError};
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Defaults to the workdir root.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferQuery {
    pub src: String,
    pub dst: String,
}

/// `GET /api/files` — list one directory level.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Entry>, FsError> {
    let entry = lister::list(&state.workdir, &query.path).await?;
    Ok(Json(entry))
}

/// `POST /api/files` — create a directory.
pub async fn create_folder(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<StatusCode, FsError> {
    let resolved = state.workdir.resolve_destination(&query.path)?;
    ops::create_folder(resolved.abs).await?;
    debug!("created folder {}", resolved.rel);
    Ok(StatusCode::OK)
}

/// `PATCH /api/files` — rename within the same parent directory.
pub async fn rename(
    State(state): State<AppState>,
    Query(query): Query<RenameQuery>,
) -> Result<StatusCode, FsError> {
    let resolved = state.workdir.resolve_existing(&query.path)?;
    if resolved.rel == "/" {
        return Err(FsError::InvalidName(
            "cannot rename the working directory".to_string(),
        ));
    }
    ops::rename(resolved.abs, query.name).await?;
    Ok(StatusCode::OK)
}

/// `DELETE /api/files` — remove a node, recursively for directories.
pub async fn delete_entry(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<StatusCode, FsError> {
    let resolved = state.workdir.resolve_existing(&query.path)?;
    if resolved.rel == "/" {
        return Err(FsError::InvalidName(
            "cannot delete the working directory".to_string(),
        ));
    }
    ops::delete(resolved.abs).await?;
    debug!("deleted {}", resolved.rel);
    Ok(StatusCode::OK)
}

/// `POST /api/files/move` — move a node to a new path under the root.
pub async fn move_entry(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
) -> Result<StatusCode, FsError> {
    let src = state.workdir.resolve_existing(&query.src)?;
    if src.rel == "/" {
        return Err(FsError::InvalidName(
            "cannot move the working directory".to_string(),
        ));
    }
    let dst = state.workdir.resolve_destination(&query.dst)?;
    ops::move_entry(src.abs, dst.abs).await?;
    debug!("moved {} -> {}", src.rel, dst.rel);
    Ok(StatusCode::OK)
}

/// `POST /api/files/copy` — duplicate a node, recursively for
/// directories.
pub async fn copy_entry(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
) -> Result<StatusCode, FsError> {
    let src = state.workdir.resolve_existing(&query.src)?;
    let dst = state.workdir.resolve_destination(&query.dst)?;
    ops::copy_entry(src.abs, dst.abs).await?;
    debug!("copied {} -> {}", src.rel, dst.rel);
    Ok(StatusCode::OK)
}

/// `POST /api/files/upload` — receive multipart file parts into the
/// target directory.
///
/// Parts are written sequentially; the first failure aborts the whole
/// request after discarding the in-flight temp file.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
    mut multipart: Multipart,
) -> Result<StatusCode, FsError> {
    let dir = state.workdir.resolve_existing(&query.path)?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(FsError::OperationFailed(format!("multipart: {e}"))),
        };
        // Only parts carrying a filename are written; other form fields
        // are ignored.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        write_part(&dir.abs, &file_name, field).await?;
        debug!("uploaded {} to {}", file_name, dir.rel);
    }

    Ok(StatusCode::CREATED)
}

async fn write_part(dir: &Path, file_name: &str, mut field: Field<'_>) -> Result<(), FsError> {
    let mut writer = upload::UploadWriter::create(dir, file_name).await?;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = writer.write(&chunk).await {
                    writer.abort().await;
                    return Err(e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                writer.abort().await;
                return Err(FsError::OperationFailed(format!("multipart: {e}")));
            }
        }
    }
    writer.finish().await
}
