//! Credential validation types.
//!
//! Registration rules are checked in a fixed order: username length, password
//! length, username availability, then password confirmation. The first two
//! live here because they need no I/O; the store checks the rest.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Usernames must be strictly longer than this many characters.
pub const USERNAME_MIN_EXCLUSIVE: usize = 2;

/// Passwords must be strictly longer than this many characters (9+ required).
pub const PASSWORD_MIN_EXCLUSIVE: usize = 8;

/// Registration validation failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Trimmed username has 2 or fewer characters.
    #[error("username too short")]
    UsernameTooShort,
    /// Trimmed password has 8 or fewer characters.
    #[error("password too short")]
    PasswordTooShort,
    /// Username already present in the credential mapping.
    #[error("username taken")]
    UsernameTaken,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl CredentialError {
    /// Message shown to the user when this error is surfaced as a flash.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UsernameTooShort => format!(
                "Username must be longer than {USERNAME_MIN_EXCLUSIVE} characters."
            ),
            Self::PasswordTooShort => format!(
                "Password must be longer than {PASSWORD_MIN_EXCLUSIVE} characters."
            ),
            Self::UsernameTaken => "That username is already taken.".to_owned(),
            Self::PasswordMismatch => "Passwords do not match.".to_owned(),
        }
    }
}

/// A username that passed the length rule.
///
/// Usernames are compared case-sensitively.
///
/// ## Examples
///
/// ```
/// use flatfile_cms_core::Username;
///
/// assert_eq!(Username::parse(" bob ").unwrap().as_str(), "bob");
/// assert!(Username::parse("al").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parse a username for registration.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::UsernameTooShort`] if the trimmed input has
    /// 2 or fewer characters.
    pub fn parse(input: &str) -> Result<Self, CredentialError> {
        let trimmed = input.trim();
        if trimmed.chars().count() <= USERNAME_MIN_EXCLUSIVE {
            return Err(CredentialError::UsernameTooShort);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the username and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check the password length rule.
///
/// The length is measured on the trimmed password, but callers store the
/// password exactly as entered.
///
/// # Errors
///
/// Returns [`CredentialError::PasswordTooShort`] if the trimmed password has
/// 8 or fewer characters.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.trim().chars().count() <= PASSWORD_MIN_EXCLUSIVE {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}
