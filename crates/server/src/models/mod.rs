//! Domain models for the server.

pub mod session;

pub use session::{Flash, SessionUser, keys as session_keys};
