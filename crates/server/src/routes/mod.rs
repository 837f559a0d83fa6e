//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (store and credential files)
//! GET  /favicon.ico              - Empty; keeps browsers from hitting /{filename}
//!
//! # Documents
//! GET  /                         - Document list
//! GET  /new                      - New document form (signed in)
//! POST /create                   - Create empty document (signed in)
//! GET  /{filename}               - View document
//! POST /{filename}               - Replace content (signed in)
//! GET  /{filename}/edit          - Edit form (signed in)
//! POST /{filename}/delete        - Delete document (signed in)
//!
//! # Users
//! GET  /users                    - Account list (admin)
//! POST /users                    - Register
//! GET  /users/new                - Registration form
//! POST /users/{username}/delete  - Delete account (admin)
//! GET  /users/signin             - Sign-in form
//! POST /users/signin             - Sign in
//! POST /users/signout            - Sign out
//! GET  /static/*                 - Stylesheets
//! ```
//!
//! Static paths win over `/{filename}`, so documents named `new`, `create`,
//! `users`, `health`, `static`, or `favicon.ico` cannot be reached through
//! the web UI.

pub mod auth;
pub mod documents;
pub mod health;
pub mod layout;
pub mod users;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{create_session_layer, security_headers_middleware};
use crate::state::AppState;

/// Create the document routes router.
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::index))
        .route("/new", get(documents::new_form))
        .route("/create", post(documents::create))
        .route("/{filename}", get(documents::show).post(documents::update))
        .route("/{filename}/edit", get(documents::edit_form))
        .route("/{filename}/delete", post(documents::delete))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::register))
        .route("/new", get(users::new_form))
        .route("/signin", get(auth::signin_form).post(auth::signin))
        .route("/signout", post(auth::signout))
        .route("/{username}/delete", post(users::delete))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .nest("/users", user_routes())
        .merge(document_routes())
}

/// Build the complete application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary, since they only matter once a
/// client is initialized.
pub fn app(state: AppState) -> Router {
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        ))
        .service(ServeDir::new(&state.config().static_dir));

    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
