//! Mapping engine errors onto HTTP responses.
//!
//! Every [`FsError`] variant has a fixed status code; the body is the
//! plain-text error message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::fs::FsError;

/// Status code for each error kind.
pub fn status_for(err: &FsError) -> StatusCode {
    match err {
        FsError::PathEscape(_) | FsError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        FsError::NotFound(_) => StatusCode::NOT_FOUND,
        FsError::AlreadyExists(_) => StatusCode::CONFLICT,
        FsError::InvalidName(_) => StatusCode::BAD_REQUEST,
        FsError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for FsError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            warn!("request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(
            status_for(&FsError::PathEscape("/..".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&FsError::NotFound("/x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FsError::AlreadyExists("/x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&FsError::PermissionDenied("/x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&FsError::InvalidName("a/b".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FsError::OperationFailed("io".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
