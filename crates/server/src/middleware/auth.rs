//! Authentication extractors.
//!
//! Wrap the guard in [`crate::services::auth`] so handlers can declare their
//! requirement in the signature. A failed check sets the flash error and
//! redirects to the document list; the handler body never runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::flash;
use crate::models::SessionUser;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSignedIn(user): RequireSignedIn,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireSignedIn(pub SessionUser);

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub SessionUser);

/// Rejection returned by the guard extractors.
pub enum AuthRejection {
    /// Flash already set; redirect to the document list.
    RedirectHome,
    /// The session layer is not installed.
    MissingSession,
    /// The admin list could not be read.
    Store(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectHome => flash::found("/"),
            Self::MissingSession => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Store(err) => err.into_response(),
        }
    }
}

fn session_from(parts: &Parts) -> Result<Session, AuthRejection> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::MissingSession)
}

/// Turn a guard failure into a rejection, setting the flash where the
/// failure is the user's to fix.
async fn reject(session: &Session, err: AuthError) -> AuthRejection {
    match err {
        AuthError::SignInRequired | AuthError::AdminRequired => {
            flash::set_error(session, err.user_message()).await;
            AuthRejection::RedirectHome
        }
        other => AuthRejection::Store(other.into()),
    }
}

impl<S> FromRequestParts<S> for RequireSignedIn
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;
        let user = auth::current_user(&session).await;

        match auth::require_signed_in(user.as_ref()) {
            Ok(user) => Ok(Self(user.clone())),
            Err(e) => Err(reject(&session, e).await),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;
        let user = auth::current_user(&session).await;

        match auth::require_admin(state.credentials(), user.as_ref()).await {
            Ok(admin) => Ok(Self(admin.clone())),
            Err(e) => Err(reject(&session, e).await),
        }
    }
}
