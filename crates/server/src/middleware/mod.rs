//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, when a DSN is configured)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (CSP, nosniff, etc.)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! Extractors in [`auth`] read the session installed by the session layer.

pub mod auth;
pub mod flash;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdmin, RequireSignedIn};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
