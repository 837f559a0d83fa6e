//! User account route handlers.
//!
//! Registration is open to anyone. Listing and deleting accounts is limited
//! to admins.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::middleware::{RequireAdmin, flash};
use crate::routes::layout::Layout;
use crate::services::auth;
use crate::state::AppState;
use crate::store::CredentialStoreError;

/// Registration form data.
///
/// Passwords are moved into `SecretString` before use.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// One row of the account list.
#[derive(Debug)]
pub struct UserRow {
    pub username: String,
    pub is_admin: bool,
}

/// Account list template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub users: Vec<UserRow>,
}

/// Registration form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/new.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub username: String,
}

/// List all accounts.
#[instrument(skip(state, session, _admin))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let credentials = state.credentials();
    let admins = credentials.load_admins().await?;
    let users = credentials
        .load_users()
        .await?
        .into_keys()
        .map(|username| UserRow {
            is_admin: admins.contains(&username),
            username,
        })
        .collect();

    Ok(IndexTemplate {
        layout: Layout::load(&state, &session).await,
        users,
    }
    .into_response())
}

/// Display the registration form.
#[instrument(skip_all)]
pub async fn new_form(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    RegisterTemplate {
        layout: Layout::load(&state, &session).await,
        username: String::new(),
    }
}

/// Create an account.
///
/// A rule violation re-renders the form with `422 Unprocessable Entity`,
/// keeping the submitted username.
#[instrument(skip(state, session, form), fields(username = %form.username.trim()))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);
    let confirm = SecretString::from(form.password_confirm);
    let result = state
        .credentials()
        .register(&form.username, &password, &confirm)
        .await;

    match result {
        Ok(username) => Ok(flash::redirect_with_success(
            &session,
            "/users/signin",
            format!("Account {username} created. Please sign in."),
        )
        .await),
        Err(CredentialStoreError::Validation(e)) => {
            let layout = Layout::load(&state, &session)
                .await
                .with_error(e.user_message());

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                RegisterTemplate {
                    layout,
                    username: form.username,
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete an account.
///
/// An admin deleting their own account is signed out as well.
#[instrument(skip(state, session, admin), fields(admin = %admin.username))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> Result<Response> {
    state.credentials().delete_user(&username).await?;

    if username == admin.username {
        auth::sign_out(&session).await?;
        clear_sentry_user();
        return Ok(
            flash::redirect_with_success(&session, "/", format!("{username} was deleted.")).await,
        );
    }

    Ok(
        flash::redirect_with_success(&session, "/users", format!("{username} was deleted."))
            .await,
    )
}
