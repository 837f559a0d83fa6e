//! Command implementations.

pub mod admins;
pub mod docs;
pub mod users;

use flatfile_cms_server::config::CmsConfig;
use flatfile_cms_server::store::CredentialStore;

/// Credential store over the configured users and admins files.
pub fn credential_store(config: &CmsConfig) -> CredentialStore {
    CredentialStore::new(&config.users_file, &config.admins_file)
}
