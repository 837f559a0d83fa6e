//! Flat-file CMS server library.
//!
//! Documents are plain files in one directory; accounts live in two YAML
//! files. The HTTP surface is exposed as a library so integration tests and
//! the `cms` CLI can reuse the stores and the router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use routes::app;
