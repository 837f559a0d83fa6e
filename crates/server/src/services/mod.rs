//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Session/auth guard (sign in, sign out, signed-in and admin checks)

pub mod auth;
