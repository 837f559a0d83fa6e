//! Document route handlers.
//!
//! Anyone may list and view documents. Creating, editing, and deleting
//! require a signed-in user. A document that is missing, badly named, or of
//! an unsupported kind sends the visitor back to the list with a flash.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use flatfile_cms_core::{ContentKind, DocumentName};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::content::render_markdown;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireSignedIn, flash};
use crate::routes::layout::Layout;
use crate::state::AppState;
use crate::store::DocumentError;

// =============================================================================
// Form Types
// =============================================================================

/// New document form data.
#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub filename: String,
}

/// Edit form data.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub file_content: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Document list template.
#[derive(Template, WebTemplate)]
#[template(path = "documents/index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub documents: Vec<DocumentName>,
}

/// New document form template.
#[derive(Template, WebTemplate)]
#[template(path = "documents/new.html")]
pub struct NewTemplate {
    pub layout: Layout,
    pub filename: String,
}

/// Rendered markdown document template.
#[derive(Template, WebTemplate)]
#[template(path = "documents/show.html")]
pub struct ShowTemplate {
    pub layout: Layout,
    pub name: DocumentName,
    pub content_html: String,
}

/// Edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "documents/edit.html")]
pub struct EditTemplate {
    pub layout: Layout,
    pub name: DocumentName,
    pub content: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Turn a failure the visitor can act on into a flash and a redirect to the
/// list. Anything else is a server fault.
async fn redirect_home(session: &Session, err: DocumentError) -> Result<Response> {
    let message = match err {
        DocumentError::Validation(e) => e.user_message(),
        DocumentError::NotFound(name) => format!("{name} does not exist."),
        DocumentError::UnsupportedKind(name) => format!("{name} cannot be displayed."),
        other @ DocumentError::Io(_) => return Err(other.into()),
    };

    Ok(flash::redirect_with_error(session, "/", message).await)
}

// =============================================================================
// Handlers
// =============================================================================

/// List every document.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response> {
    let documents = state.documents().list().await?;

    Ok(IndexTemplate {
        layout: Layout::load(&state, &session).await,
        documents,
    }
    .into_response())
}

/// Display the new document form.
#[instrument(skip_all)]
pub async fn new_form(
    RequireSignedIn(_user): RequireSignedIn,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    NewTemplate {
        layout: Layout::load(&state, &session).await,
        filename: String::new(),
    }
}

/// Create an empty document.
///
/// An invalid name re-renders the form with `422 Unprocessable Entity`.
#[instrument(skip(state, session, user), fields(user = %user.username))]
pub async fn create(
    RequireSignedIn(user): RequireSignedIn,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CreateForm>,
) -> Result<Response> {
    match state.documents().create(&form.filename).await {
        Ok(name) => {
            tracing::info!(document = %name, "Document created");
            Ok(flash::redirect_with_success(&session, "/", format!("{name} was created.")).await)
        }
        Err(DocumentError::Validation(e)) => {
            let layout = Layout::load(&state, &session)
                .await
                .with_error(e.user_message());

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                NewTemplate {
                    layout,
                    filename: form.filename,
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display a document.
///
/// Plain text is served verbatim; markdown is rendered into the page layout.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    let name = match DocumentName::from_request(&filename) {
        Ok(name) => name,
        Err(e) => return redirect_home(&session, e.into()).await,
    };

    let document = match state.documents().read(&name).await {
        Ok(document) => document,
        Err(e) => return redirect_home(&session, e).await,
    };

    match document.kind {
        ContentKind::Markdown => Ok(ShowTemplate {
            layout: Layout::load(&state, &session).await,
            content_html: render_markdown(&document.text()),
            name: document.name,
        }
        .into_response()),
        // `read` never yields unsupported documents
        ContentKind::PlainText | ContentKind::Unsupported => {
            Ok(([(CONTENT_TYPE, document.kind.content_type())], document.content).into_response())
        }
    }
}

/// Display the edit form with the document's current content.
#[instrument(skip(state, session, _user))]
pub async fn edit_form(
    RequireSignedIn(_user): RequireSignedIn,
    State(state): State<AppState>,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    let name = match DocumentName::from_request(&filename) {
        Ok(name) => name,
        Err(e) => return redirect_home(&session, e.into()).await,
    };

    let content = match state.documents().read_raw(&name).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => return redirect_home(&session, e).await,
    };

    Ok(EditTemplate {
        layout: Layout::load(&state, &session).await,
        name,
        content,
    }
    .into_response())
}

/// Replace a document's content.
#[instrument(skip(state, session, user, form), fields(user = %user.username))]
pub async fn update(
    RequireSignedIn(user): RequireSignedIn,
    State(state): State<AppState>,
    session: Session,
    Path(filename): Path<String>,
    Form(form): Form<UpdateForm>,
) -> Result<Response> {
    let name = match DocumentName::from_request(&filename) {
        Ok(name) => name,
        Err(e) => return redirect_home(&session, e.into()).await,
    };

    state
        .documents()
        .write(&name, form.file_content.as_bytes())
        .await?;

    tracing::info!(document = %name, "Document updated");
    Ok(flash::redirect_with_success(&session, "/", format!("{name} has been updated")).await)
}

/// Delete a document.
#[instrument(skip(state, session, user), fields(user = %user.username))]
pub async fn delete(
    RequireSignedIn(user): RequireSignedIn,
    State(state): State<AppState>,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response> {
    let name = match DocumentName::from_request(&filename) {
        Ok(name) => name,
        Err(e) => return redirect_home(&session, e.into()).await,
    };

    if let Err(e) = state.documents().delete(&name).await {
        return redirect_home(&session, e).await;
    }

    tracing::info!(document = %name, "Document deleted");
    Ok(flash::redirect_with_success(&session, "/", format!("{name} was deleted.")).await)
}
