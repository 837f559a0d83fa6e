//! Admin list management.
//!
//! The server only ever reads the admins file, so granting and revoking
//! admin rights happens here, by rewriting the file in full.

use std::collections::BTreeSet;
use std::io;

use flatfile_cms_server::store::{CredentialStore, CredentialStoreError, write_replacing};
use thiserror::Error;

/// Errors that can occur while editing the admin list.
#[derive(Debug, Error)]
pub enum AdminsError {
    /// A credential file could not be read.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),

    /// Only existing accounts can be made admins.
    #[error("No account named {0}")]
    UnknownUser(String),

    /// The admin list could not be serialized.
    #[error("Failed to serialize admin list: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The admins file could not be written.
    #[error("Failed to write admins file: {0}")]
    Persist(#[from] io::Error),
}

/// Print every admin username.
///
/// # Errors
///
/// Returns an error if the admins file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(credentials: &CredentialStore) -> Result<(), AdminsError> {
    for username in credentials.load_admins().await? {
        println!("{username}");
    }
    Ok(())
}

/// Add an existing account to the admin list.
///
/// # Errors
///
/// Returns `AdminsError::UnknownUser` if the account does not exist, or a
/// file error if either credential file cannot be read or written.
pub async fn grant(credentials: &CredentialStore, username: &str) -> Result<(), AdminsError> {
    if !credentials.user_exists(username).await? {
        return Err(AdminsError::UnknownUser(username.to_owned()));
    }

    let mut admins = credentials.load_admins().await?;
    if !admins.insert(username.to_owned()) {
        tracing::info!("{} is already an admin", username);
        return Ok(());
    }

    persist(credentials, &admins).await?;
    tracing::info!("Granted admin rights to {}", username);
    Ok(())
}

/// Remove a username from the admin list.
///
/// # Errors
///
/// Returns an error if the admins file cannot be read or written.
pub async fn revoke(credentials: &CredentialStore, username: &str) -> Result<(), AdminsError> {
    let mut admins = credentials.load_admins().await?;
    if !admins.remove(username) {
        tracing::info!("{} is not an admin", username);
        return Ok(());
    }

    persist(credentials, &admins).await?;
    tracing::info!("Revoked admin rights from {}", username);
    Ok(())
}

async fn persist(credentials: &CredentialStore, admins: &BTreeSet<String>) -> Result<(), AdminsError> {
    let yaml = serde_yaml::to_string(&admins.iter().collect::<Vec<_>>())?;
    write_replacing(credentials.admins_file(), yaml.as_bytes()).await?;
    Ok(())
}
