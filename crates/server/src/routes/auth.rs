//! Sign-in and sign-out route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::flash;
use crate::routes::layout::Layout;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Sign-in form data.
#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/signin.html")]
pub struct SignInTemplate {
    pub layout: Layout,
    pub username: String,
}

/// Display the sign-in form.
#[instrument(skip_all)]
pub async fn signin_form(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    SignInTemplate {
        layout: Layout::load(&state, &session).await,
        username: String::new(),
    }
}

/// Handle sign-in form submission.
///
/// Wrong credentials re-render the form with `422 Unprocessable Entity`,
/// keeping the submitted username.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signin(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);

    match auth::sign_in(state.credentials(), &session, &form.username, &password).await {
        Ok(user) => {
            set_sentry_user(&user.username);
            tracing::info!(username = %user.username, "Signed in");
            Ok(flash::redirect_with_success(&session, "/", "Welcome!").await)
        }
        Err(e @ AuthError::InvalidCredentials) => {
            tracing::info!("Sign-in rejected");
            let layout = Layout::load(&state, &session)
                .await
                .with_error(e.user_message());

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                SignInTemplate {
                    layout,
                    username: form.username,
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Sign out and return to the document list.
#[instrument(skip_all)]
pub async fn signout(session: Session) -> Result<Response> {
    auth::sign_out(&session).await?;
    clear_sentry_user();

    Ok(flash::redirect_with_success(&session, "/", "You have been signed out.").await)
}
