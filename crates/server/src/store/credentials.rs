//! Credential store backed by two YAML files.
//!
//! - The users file is a mapping of username to password.
//! - The admins file is a list of usernames. This store only ever reads it.
//!
//! Every mutation is a whole-file read-modify-write. A single mutex is held
//! across load, modify, and persist so concurrent registrations cannot lose
//! each other's updates. Persisting writes a sibling temporary file and
//! renames it over the original.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use flatfile_cms_core::{CredentialError, Username, validate_password};
use secrecy::{ExposeSecret, SecretString};
use serde_yaml::Value;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors returned by [`CredentialStore`] operations.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// Registration input failed validation.
    #[error(transparent)]
    Validation(#[from] CredentialError),

    /// A backing file is missing or malformed.
    #[error("credential store unavailable ({}): {reason}", .path.display())]
    Unavailable { path: PathBuf, reason: String },

    /// Writing the users file failed.
    #[error("failed to persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Username → password mapping as loaded from the users file.
pub type UserMap = BTreeMap<String, String>;

/// Flat-file credential store.
#[derive(Debug)]
pub struct CredentialStore {
    users_file: PathBuf,
    admins_file: PathBuf,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Create a store over the given users and admins files.
    #[must_use]
    pub fn new(users_file: impl Into<PathBuf>, admins_file: impl Into<PathBuf>) -> Self {
        Self {
            users_file: users_file.into(),
            admins_file: admins_file.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the users file.
    #[must_use]
    pub fn users_file(&self) -> &Path {
        &self.users_file
    }

    /// Path of the admins file.
    #[must_use]
    pub fn admins_file(&self) -> &Path {
        &self.admins_file
    }

    /// Load the full username → password mapping.
    ///
    /// Scalar passwords that YAML parses as numbers or booleans are read back
    /// as their literal text.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the file is missing or
    /// is not a mapping of strings to scalars.
    pub async fn load_users(&self) -> Result<UserMap, CredentialStoreError> {
        let path = &self.users_file;
        let Some(value) = load_yaml(path).await? else {
            return Ok(UserMap::new());
        };

        let Value::Mapping(mapping) = value else {
            return Err(unavailable(path, "expected a mapping of username to password"));
        };

        mapping
            .into_iter()
            .map(|(key, value)| match (key, scalar_to_string(value)) {
                (Value::String(username), Some(password)) => Ok((username, password)),
                _ => Err(unavailable(path, "usernames and passwords must be scalars")),
            })
            .collect()
    }

    /// Load the set of admin usernames.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the file is missing or
    /// is not a list of strings.
    pub async fn load_admins(&self) -> Result<BTreeSet<String>, CredentialStoreError> {
        let path = &self.admins_file;
        match load_yaml(path).await? {
            None => Ok(BTreeSet::new()),
            Some(value) => serde_yaml::from_value(value).map_err(|e| unavailable(path, e)),
        }
    }

    /// Whether `username` is present in the users file.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the users file cannot be loaded.
    pub async fn user_exists(&self, username: &str) -> Result<bool, CredentialStoreError> {
        Ok(self.load_users().await?.contains_key(username))
    }

    /// Whether `username` is in the admin list.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the admins file cannot be loaded.
    pub async fn is_admin(&self, username: &str) -> Result<bool, CredentialStoreError> {
        Ok(self.load_admins().await?.contains(username))
    }

    /// Check a username/password pair against the users file.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the users file cannot be loaded.
    pub async fn verify(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, CredentialStoreError> {
        let users = self.load_users().await?;
        Ok(users
            .get(username)
            .is_some_and(|stored| stored == password.expose_secret()))
    }

    /// Register a new user.
    ///
    /// Rules are checked in order: username length, password length,
    /// username availability, confirmation match. Nothing is written unless
    /// every rule passes.
    ///
    /// # Errors
    ///
    /// - `CredentialStoreError::Validation` for the first rule that fails
    /// - `CredentialStoreError::Unavailable` if the users file cannot be loaded
    /// - `CredentialStoreError::Persist` if the users file cannot be written
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<Username, CredentialStoreError> {
        let username = Username::parse(username)?;
        validate_password(password.expose_secret())?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;

        if users.contains_key(username.as_str()) {
            return Err(CredentialError::UsernameTaken.into());
        }

        if password.expose_secret() != confirm.expose_secret() {
            return Err(CredentialError::PasswordMismatch.into());
        }

        users.insert(
            username.as_str().to_owned(),
            password.expose_secret().to_owned(),
        );
        self.persist_users(&users).await?;

        tracing::info!(username = %username, "Registered user");
        Ok(username)
    }

    /// Remove a user. Removing an absent user still succeeds.
    ///
    /// Returns whether a user was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `CredentialStoreError::Unavailable` if the users file cannot be
    /// loaded, or `CredentialStoreError::Persist` if it cannot be written.
    pub async fn delete_user(&self, username: &str) -> Result<bool, CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;

        let removed = users.remove(username).is_some();
        self.persist_users(&users).await?;

        tracing::info!(username, removed, "Deleted user");
        Ok(removed)
    }

    async fn persist_users(&self, users: &UserMap) -> Result<(), CredentialStoreError> {
        let yaml = serde_yaml::to_string(users).map_err(|e| CredentialStoreError::Persist {
            path: self.users_file.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        write_replacing(&self.users_file, yaml.as_bytes())
            .await
            .map_err(|source| CredentialStoreError::Persist {
                path: self.users_file.clone(),
                source,
            })
    }
}

/// Read and parse a YAML file. Blank or null documents yield `None`.
async fn load_yaml(path: &Path) -> Result<Option<Value>, CredentialStoreError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| unavailable(path, e))?;

    if raw.trim().is_empty() {
        return Ok(None);
    }

    match serde_yaml::from_str::<Value>(&raw).map_err(|e| unavailable(path, e))? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn unavailable(path: &Path, reason: impl ToString) -> CredentialStoreError {
    CredentialStoreError::Unavailable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Write `contents` to a temporary sibling of `path`, then rename it into place.
pub async fn write_replacing(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents).await?;
    tokio::fs::rename(&tmp_path, path).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn store_with(users: &str, admins: &str) -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("users.yml"), users).unwrap();
        std::fs::write(dir.path().join("admins.yml"), admins).unwrap();
        let store = CredentialStore::new(
            dir.path().join("users.yml"),
            dir.path().join("admins.yml"),
        );
        (dir, store)
    }

    #[tokio::test]
    async fn test_load_users_and_admins() {
        let (_dir, store) = store_with("admin: secret\nbob: '123456789'\n", "- admin\n");

        let users = store.load_users().await.unwrap();
        assert_eq!(users.get("admin").map(String::as_str), Some("secret"));
        assert_eq!(users.get("bob").map(String::as_str), Some("123456789"));

        assert!(store.is_admin("admin").await.unwrap());
        assert!(!store.is_admin("bob").await.unwrap());
        assert!(!store.is_admin("Admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_numeric_passwords_read_as_text() {
        let (_dir, store) = store_with("carol: 123456789\n", "");
        assert!(store.verify("carol", &secret("123456789")).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_files_are_empty() {
        let (_dir, store) = store_with("", "---\n");
        assert!(store.load_users().await.unwrap().is_empty());
        assert!(store.load_admins().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nope.yml"), dir.path().join("nada.yml"));

        assert!(matches!(
            store.load_users().await.unwrap_err(),
            CredentialStoreError::Unavailable { .. }
        ));
        assert!(matches!(
            store.load_admins().await.unwrap_err(),
            CredentialStoreError::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_file_is_unavailable() {
        let (_dir, store) = store_with("- just\n- a list\n", "admin: yes\n");
        assert!(matches!(
            store.load_users().await.unwrap_err(),
            CredentialStoreError::Unavailable { .. }
        ));
        assert!(matches!(
            store.load_admins().await.unwrap_err(),
            CredentialStoreError::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_verify() {
        let (_dir, store) = store_with("admin: secret\n", "- admin\n");
        assert!(store.verify("admin", &secret("secret")).await.unwrap());
        assert!(!store.verify("admin", &secret("wrong")).await.unwrap());
        assert!(!store.verify("", &secret("")).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_persists() {
        let (dir, store) = store_with("admin: secret\n", "- admin\n");

        let username = store
            .register(" dave ", &secret("longenough"), &secret("longenough"))
            .await
            .unwrap();
        assert_eq!(username.as_str(), "dave");

        let reopened = CredentialStore::new(
            dir.path().join("users.yml"),
            dir.path().join("admins.yml"),
        );
        assert!(reopened.user_exists("dave").await.unwrap());
        assert!(reopened.user_exists("admin").await.unwrap());
        assert!(!dir.path().join("users.yml.tmp").exists());
    }

    #[tokio::test]
    async fn test_register_validation_order() {
        let (_dir, store) = store_with("admin: secret\n", "");

        // Short username wins over every later rule.
        let err = store
            .register("ad", &secret("short"), &secret("other"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialStoreError::Validation(CredentialError::UsernameTooShort)
        ));

        // Password length is checked before availability.
        let err = store
            .register("admin", &secret("12345678"), &secret("12345678"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialStoreError::Validation(CredentialError::PasswordTooShort)
        ));

        // Availability is checked before the confirmation.
        let err = store
            .register("admin", &secret("123456789"), &secret("987654321"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialStoreError::Validation(CredentialError::UsernameTaken)
        ));

        let err = store
            .register("erin", &secret("123456789"), &secret("987654321"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialStoreError::Validation(CredentialError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_rejected_registration_leaves_file_untouched() {
        let original = "admin: secret\n";
        let (dir, store) = store_with(original, "");

        let _ = store
            .register("admin", &secret("123456789"), &secret("123456789"))
            .await;
        let _ = store
            .register("frank", &secret("123456789"), &secret("mismatch!!"))
            .await;

        let on_disk = std::fs::read_to_string(dir.path().join("users.yml")).unwrap();
        assert_eq!(on_disk, original);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (_dir, store) = store_with("admin: secret\ngina: password12\n", "");

        assert!(store.delete_user("gina").await.unwrap());
        assert!(!store.user_exists("gina").await.unwrap());

        // Absent users are a successful no-op.
        assert!(!store.delete_user("gina").await.unwrap());
        assert!(store.user_exists("admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_registrations_are_not_lost() {
        let (_dir, store) = store_with("", "");
        let store = Arc::new(store);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let password = secret("password-123");
                    store
                        .register(&format!("user{i:02}"), &password, &password)
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.load_users().await.unwrap().len(), 16);
    }
}
