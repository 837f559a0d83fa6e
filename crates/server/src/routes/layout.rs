//! Data shared by every full-page template.

use tower_sessions::Session;

use crate::middleware::flash;
use crate::models::Flash;
use crate::services::auth;
use crate::state::AppState;

/// Header and flash data rendered by `base.html`.
#[derive(Debug, Default)]
pub struct Layout {
    /// Signed-in username, if any.
    pub username: Option<String>,
    /// Whether the signed-in user may manage accounts.
    pub is_admin: bool,
    /// Messages left by the previous request.
    pub flash: Flash,
}

impl Layout {
    /// Build the layout for the current request and consume the pending flash.
    ///
    /// An unreadable admins file only hides the admin links; the page still
    /// renders.
    pub async fn load(state: &AppState, session: &Session) -> Self {
        let user = auth::current_user(session).await;

        let is_admin = match &user {
            Some(user) => state
                .credentials()
                .is_admin(&user.username)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to read admin list: {}", e);
                    false
                }),
            None => false,
        };

        Self {
            username: user.map(|u| u.username),
            is_admin,
            flash: flash::take(session).await,
        }
    }

    /// Show `message` as an error on the page being rendered now.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flash.error = Some(message.into());
        self
    }
}
