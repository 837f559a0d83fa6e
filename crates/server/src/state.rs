//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CmsConfig;
use crate::store::{CredentialStore, DocumentError, DocumentStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-request data (the signed-in
/// user, flash messages) lives in the session, never here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CmsConfig,
    documents: DocumentStore,
    credentials: CredentialStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Creates the document directory if it is missing. The credential files
    /// are not checked here; a missing users file surfaces as a 503 on the
    /// first request that needs it, and `/health/ready` reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document directory cannot be created.
    pub async fn new(config: CmsConfig) -> Result<Self, DocumentError> {
        let documents = DocumentStore::new(&config.data_dir);
        documents.ensure_root().await?;

        let credentials = CredentialStore::new(&config.users_file, &config.admins_file);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                credentials,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CmsConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn documents(&self) -> &DocumentStore {
        &self.inner.documents
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }
}
