//! Account management commands.
//!
//! These go through the same [`CredentialStore`] as the web registration
//! form, so the same length and uniqueness rules apply.

use flatfile_cms_server::store::{CredentialStore, CredentialStoreError};
use secrecy::SecretString;

/// Print every account, marking admins.
///
/// # Errors
///
/// Returns an error if either credential file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(credentials: &CredentialStore) -> Result<(), CredentialStoreError> {
    let users = credentials.load_users().await?;
    let admins = credentials.load_admins().await?;

    for username in users.keys() {
        if admins.contains(username) {
            println!("{username} (admin)");
        } else {
            println!("{username}");
        }
    }
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns `CredentialStoreError::Validation` if the username or password
/// breaks a registration rule, or a file error if the users file cannot be
/// read or written.
pub async fn add(
    credentials: &CredentialStore,
    username: &str,
    password: String,
) -> Result<(), CredentialStoreError> {
    let password = SecretString::from(password);
    let username = credentials.register(username, &password, &password).await?;

    tracing::info!("Account created: {}", username);
    Ok(())
}

/// Remove an account. Removing an unknown account only logs a warning.
///
/// # Errors
///
/// Returns an error if the users file cannot be read or written.
pub async fn remove(credentials: &CredentialStore, username: &str) -> Result<(), CredentialStoreError> {
    if credentials.delete_user(username).await? {
        tracing::info!("Account removed: {}", username);
    } else {
        tracing::warn!("No account named {}", username);
    }

    if credentials.is_admin(username).await.unwrap_or(false) {
        tracing::warn!(
            "{} is still listed in {}; run `cms admins revoke {}`",
            username,
            credentials.admins_file().display(),
            username
        );
    }
    Ok(())
}
