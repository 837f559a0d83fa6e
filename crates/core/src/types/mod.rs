//! Core types for flatfile-cms.
//!
//! This module provides type-safe wrappers for document names and credentials.

pub mod credential;
pub mod document;

pub use credential::{
    CredentialError, PASSWORD_MIN_EXCLUSIVE, USERNAME_MIN_EXCLUSIVE, Username, validate_password,
};
pub use document::{ContentKind, DocumentName, DocumentNameError};
