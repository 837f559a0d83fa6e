//! Flash messages.
//!
//! A message set while handling one request is shown by the next page that
//! renders, then discarded. Failures to read or write the flash are logged
//! and otherwise ignored: losing a status message must not fail a request
//! whose real work already succeeded.

use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

use crate::models::{Flash, session_keys};

async fn update(session: &Session, apply: impl FnOnce(&mut Flash)) {
    let mut flash = session
        .get::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    apply(&mut flash);

    if let Err(e) = session.insert(session_keys::FLASH, &flash).await {
        tracing::error!("Failed to store flash message: {}", e);
    }
}

/// Set the error message for the next rendered page.
pub async fn set_error(session: &Session, message: impl Into<String>) {
    let message = message.into();
    update(session, |flash| flash.error = Some(message)).await;
}

/// Set the success message for the next rendered page.
pub async fn set_success(session: &Session, message: impl Into<String>) {
    let message = message.into();
    update(session, |flash| flash.success = Some(message)).await;
}

/// Read and clear pending flash messages.
pub async fn take(session: &Session) -> Flash {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read flash message: {}", e);
            Flash::default()
        }
    }
}

/// `302 Found` redirect.
///
/// Used instead of `axum::response::Redirect`, whose helpers answer with
/// 303/307/308.
#[must_use]
pub fn found(to: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, to)]).into_response()
}

/// Set an error flash and redirect.
pub async fn redirect_with_error(session: &Session, to: &str, message: impl Into<String>) -> Response {
    set_error(session, message).await;
    found(to)
}

/// Set a success flash and redirect.
pub async fn redirect_with_success(
    session: &Session,
    to: &str,
    message: impl Into<String>,
) -> Response {
    set_success(session, message).await;
    found(to)
}
