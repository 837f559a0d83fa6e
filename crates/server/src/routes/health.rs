//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies that the document directory is listable and both credential
/// files load. Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if let Err(e) = state.documents().list().await {
        tracing::warn!("Readiness check failed for documents: {}", e);
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    let credentials = state.credentials();
    if let Err(e) = credentials.load_users().await {
        tracing::warn!("Readiness check failed for users: {}", e);
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    if let Err(e) = credentials.load_admins().await {
        tracing::warn!("Readiness check failed for admins: {}", e);
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    StatusCode::OK
}
