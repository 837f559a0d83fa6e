//! Session/auth guard.
//!
//! Two facts gate every protected operation: whether a user is signed in,
//! and whether that user is an admin. The session stores only the username;
//! admin status is re-read from the admins file on every check.
//!
//! Protected operations:
//!
//! | Guard | Operations |
//! |---|---|
//! | [`require_signed_in`] | new-document form, create, edit form, update, delete |
//! | [`require_admin`] | list users, delete user |

mod error;

pub use error::AuthError;

use secrecy::SecretString;
use tower_sessions::Session;

use crate::models::{SessionUser, session_keys};
use crate::store::CredentialStore;

/// Admit the request only if a user is signed in.
///
/// # Errors
///
/// Returns `AuthError::SignInRequired` when `user` is `None`.
pub fn require_signed_in(user: Option<&SessionUser>) -> Result<&SessionUser, AuthError> {
    match user {
        Some(user) => Ok(user),
        None => Err(AuthError::SignInRequired),
    }
}

/// Admit the request only if the signed-in user is an admin.
///
/// # Errors
///
/// - `AuthError::SignInRequired` when nobody is signed in
/// - `AuthError::AdminRequired` when the user is not in the admin list
/// - `AuthError::Store` when the admin list cannot be read
pub async fn require_admin<'a>(
    credentials: &CredentialStore,
    user: Option<&'a SessionUser>,
) -> Result<&'a SessionUser, AuthError> {
    let user = require_signed_in(user)?;
    if credentials.is_admin(&user.username).await? {
        Ok(user)
    } else {
        Err(AuthError::AdminRequired)
    }
}

/// The user stored in the session, if any.
///
/// Unreadable session data counts as signed out.
pub async fn current_user(session: &Session) -> Option<SessionUser> {
    match session.get::<SessionUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Failed to read session user: {}", e);
            None
        }
    }
}

/// Check credentials against the users file and sign the user in.
///
/// The username is trimmed the same way registration trims it. The session
/// id is replaced before the user is stored in it.
///
/// # Errors
///
/// - `AuthError::InvalidCredentials` if the pair does not match
/// - `AuthError::Store` if the users file cannot be read
/// - `AuthError::Session` if the session cannot be written
pub async fn sign_in(
    credentials: &CredentialStore,
    session: &Session,
    username: &str,
    password: &SecretString,
) -> Result<SessionUser, AuthError> {
    let username = username.trim();
    if !credentials.verify(username, password).await? {
        return Err(AuthError::InvalidCredentials);
    }

    session.cycle_id().await?;
    let user = SessionUser::new(username);
    session.insert(session_keys::CURRENT_USER, &user).await?;
    Ok(user)
}

/// Clear the signed-in user. Signing out while signed out is not an error.
///
/// # Errors
///
/// Returns `AuthError::Session` if the session cannot be written.
pub async fn sign_out(session: &Session) -> Result<(), AuthError> {
    session
        .remove::<SessionUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
