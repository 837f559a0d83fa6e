//! Session-related types.
//!
//! Types stored in the session for authentication state and flash messages.

use serde::{Deserialize, Serialize};

/// Session-stored identity of the signed-in user.
///
/// Only the username is kept. Admin status is looked up again on every check
/// so that revoking an admin takes effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Username as stored in the users file.
    pub username: String,
}

impl SessionUser {
    /// Identity for the given username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// One-shot status messages shown on the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Message rendered in the error style.
    pub error: Option<String>,
    /// Message rendered in the success style.
    pub success: Option<String>,
}

impl Flash {
    /// Whether neither slot is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}
