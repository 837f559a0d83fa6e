//! Authentication error types.

use thiserror::Error;

use crate::store::CredentialStoreError;

/// Errors that can occur in the session/auth guard.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user is signed in.
    #[error("sign-in required")]
    SignInRequired,

    /// The signed-in user is not in the admin list.
    #[error("admin required")]
    AdminRequired,

    /// Username/password pair did not match the users file.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credential store could not be read.
    #[error("credential store error: {0}")]
    Store(#[from] CredentialStoreError),

    /// The session could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Message shown to the user as a flash.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::SignInRequired => "You must be signed in to do that.",
            Self::AdminRequired => "You must be an admin to do that.",
            Self::InvalidCredentials => "Invalid credentials",
            Self::Store(_) | Self::Session(_) => "Something went wrong. Please try again.",
        }
    }
}
