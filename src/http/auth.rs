//! HTTP Basic access control against the configured credentials.
//!
//! The config stores the sha256 hex digest of the password, never the
//! password itself. Every route, API and static alike, sits behind this
//! middleware.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::http::AppState;

/// Middleware enforcing Basic auth on every request.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match credentials(request.headers().get(header::AUTHORIZATION)) {
        Some((user, password)) if verify(&state, &user, &password) => next.run(request).await,
        Some((user, _)) => {
            debug!("rejected credentials for user {user:?}");
            challenge()
        }
        None => challenge(),
    }
}

fn verify(state: &AppState, user: &str, password: &str) -> bool {
    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    user == state.config.user && digest == state.config.password_hash
}

/// Extract `(user, password)` from a `Basic` Authorization header.
fn credentials(header: Option<&HeaderValue>) -> Option<(String, String)> {
    let value = header?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"filedeck\"")],
        "Authentication required",
    )
        .into_response()
}
