//! Integration test harness for the flat-file CMS.
//!
//! Each [`TestContext`] starts the real router on an ephemeral loopback port,
//! backed by a fresh temporary directory:
//!
//! ```text
//! <tmp>/data/        - document store (empty)
//! <tmp>/users.yml    - admin: secret
//! <tmp>/admins.yml   - [admin]
//! ```
//!
//! The client keeps cookies and does not follow redirects, so tests can
//! assert on the `302` and then follow it by hand to see the flash message.
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let ctx = TestContext::new().await;
//!     let resp = ctx.get("/health").await;
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

use std::path::PathBuf;

use flatfile_cms_server::config::CmsConfig;
use flatfile_cms_server::state::AppState;
use reqwest::{Client, Response, header::LOCATION, redirect::Policy};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Username of the seeded admin account.
pub const ADMIN_USERNAME: &str = "admin";

/// Password of the seeded admin account.
pub const ADMIN_PASSWORD: &str = "secret";

/// A running server plus a cookie-keeping client.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    dir: TempDir,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a server over a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory, listener, or client cannot be set up.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("users.yml"), "admin: secret\n")
            .expect("Failed to seed users file");
        std::fs::write(dir.path().join("admins.yml"), "- admin\n")
            .expect("Failed to seed admins file");

        let config = CmsConfig::rooted_at(dir.path());
        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let state = AppState::new(config)
            .await
            .expect("Failed to initialize app state");
        let app = flatfile_cms_server::app(state);

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            dir,
            server,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Document store directory.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Users file path.
    #[must_use]
    pub fn users_file(&self) -> PathBuf {
        self.dir.path().join("users.yml")
    }

    /// Write a document straight into the store directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.data_path().join(name), content).expect("Failed to write document");
    }

    /// Whether a document file exists on disk.
    #[must_use]
    pub fn document_exists(&self, name: &str) -> bool {
        self.data_path().join(name).is_file()
    }

    /// Current users file contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn users_yaml(&self) -> String {
        std::fs::read_to_string(self.users_file()).expect("Failed to read users file")
    }

    /// `GET` a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// `POST` a urlencoded form to a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Follow a redirect response and return the body of the target page.
    ///
    /// # Panics
    ///
    /// Panics if `resp` has no `Location` header or the follow-up fails.
    pub async fn follow(&self, resp: &Response) -> String {
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("Response has no Location header")
            .to_owned();

        self.get(&location)
            .await
            .text()
            .await
            .expect("Failed to read response body")
    }

    /// Sign in and consume the resulting "Welcome!" flash.
    ///
    /// # Panics
    ///
    /// Panics if sign-in does not redirect.
    pub async fn sign_in(&self, username: &str, password: &str) {
        let resp = self
            .post(
                "/users/signin",
                &[("username", username), ("password", password)],
            )
            .await;
        assert_eq!(resp.status(), 302, "sign-in as {username} failed");
        self.follow(&resp).await;
    }

    /// Sign in as the seeded admin.
    pub async fn sign_in_as_admin(&self) {
        self.sign_in(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}
