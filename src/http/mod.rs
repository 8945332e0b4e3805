//! HTTP surface: shared state, router construction, auth, and the
//! error-to-status mapping.

pub mod auth;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::fs::Workdir;

/// Immutable per-request state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub workdir: Workdir,
    pub config: Arc<Config>,
}

/// Build the full application router: the file API under `/api/files`
/// plus the workdir served as static content for everything else.
pub fn router(config: Config, workdir: Workdir) -> Router {
    let state = AppState {
        workdir: workdir.clone(),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/api/files",
            get(handlers::list)
                .post(handlers::create_folder)
                .patch(handlers::rename)
                .delete(handlers::delete_entry),
        )
        .route("/api/files/upload", post(handlers::upload))
        .route("/api/files/copy", post(handlers::copy_entry))
        .route("/api/files/move", post(handlers::move_entry))
        .fallback_service(ServeDir::new(workdir.root()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
