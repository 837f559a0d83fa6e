//! Flat-file persistence.
//!
//! # Layout
//!
//! ```text
//! <data_dir>/            - one regular file per document, no subdirectories
//! <users_file>           - YAML mapping: username -> password
//! <admins_file>          - YAML list of admin usernames (read-only here)
//! ```
//!
//! Both stores are plain structs over paths; the HTTP layer reaches them
//! through [`crate::state::AppState`].

pub mod credentials;
pub mod documents;

pub use credentials::{CredentialStore, CredentialStoreError, UserMap, write_replacing};
pub use documents::{Document, DocumentError, DocumentStore};
