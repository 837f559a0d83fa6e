//! Unified error handling with Sentry integration.
//!
//! User-facing failures (validation, missing documents, missing sign-in) are
//! turned into a flash message and a redirect or 422 re-render inside the
//! handlers. Whatever reaches `AppError` is a server-side fault: it is
//! captured to Sentry and answered with a plain 5xx.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::store::{CredentialStoreError, DocumentError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential files missing, malformed, or not writable.
    #[error("Credential store error: {0}")]
    Credentials(#[from] CredentialStoreError),

    /// Document directory operation failed.
    #[error("Document store error: {0}")]
    Documents(#[from] DocumentError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Authentication failure that could not be turned into a redirect.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Credentials(CredentialStoreError::Unavailable { .. })
            | Self::Auth(AuthError::Store(CredentialStoreError::Unavailable { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Auth(AuthError::SignInRequired) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::AdminRequired) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
            StatusCode::UNAUTHORIZED => "Sign-in required",
            StatusCode::FORBIDDEN => "Admin required",
            _ => "Internal server error",
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a username.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
