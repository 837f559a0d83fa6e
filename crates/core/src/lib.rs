//! flatfile-cms core - Shared domain types.
//!
//! This crate provides the types used by every flatfile-cms component:
//! - `server` - The HTTP content-management service
//! - `cli` - Operator tooling for the flat files
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! filesystem access, no HTTP. This keeps the rules testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document names, usernames, and their errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
