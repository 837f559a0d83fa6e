//! Registration and admin-only account management.

use flatfile_cms_integration_tests::TestContext;
use reqwest::StatusCode;

async fn register(
    ctx: &TestContext,
    username: &str,
    password: &str,
    confirm: &str,
) -> reqwest::Response {
    ctx.post(
        "/users",
        &[
            ("username", username),
            ("password", password),
            ("password_confirm", confirm),
        ],
    )
    .await
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_registration_form() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/users/new").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(r#"name="password_confirm""#));
}

#[tokio::test]
async fn test_register_then_sign_in() {
    let ctx = TestContext::new().await;

    let resp = register(&ctx, "alice", "long-password", "long-password").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()["location"], "/users/signin");
    assert!(ctx.follow(&resp).await.contains("Account alice created. Please sign in."));
    assert!(ctx.users_yaml().contains("alice"));

    ctx.sign_in("alice", "long-password").await;
    let body = ctx.get("/").await.text().await.expect("Failed to read body");
    assert!(body.contains("Signed in as alice"));
}

#[tokio::test]
async fn test_register_password_boundary() {
    let ctx = TestContext::new().await;

    // Exactly 8 characters is too short.
    let resp = register(&ctx, "alice", "12345678", "12345678").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp
        .text()
        .await
        .expect("Failed to read body")
        .contains("Password must be longer than 8 characters."));

    let resp = register(&ctx, "alice", "123456789", "123456789").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_register_short_username() {
    let ctx = TestContext::new().await;

    let resp = register(&ctx, "al", "long-password", "long-password").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!ctx.users_yaml().contains("al:"));
}

#[tokio::test]
async fn test_register_taken_username_leaves_store_unchanged() {
    let ctx = TestContext::new().await;
    let before = ctx.users_yaml();

    let resp = register(&ctx, "admin", "long-password", "long-password").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp
        .text()
        .await
        .expect("Failed to read body")
        .contains("That username is already taken."));
    assert_eq!(ctx.users_yaml(), before);
}

#[tokio::test]
async fn test_register_mismatched_confirmation_leaves_store_unchanged() {
    let ctx = TestContext::new().await;
    let before = ctx.users_yaml();

    let resp = register(&ctx, "alice", "long-password", "other-password").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Passwords do not match."));
    assert!(body.contains(r#"value="alice""#));
    assert_eq!(ctx.users_yaml(), before);
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_user_list_requires_sign_in() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/users").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(ctx.follow(&resp).await.contains("You must be signed in to do that."));
}

#[tokio::test]
async fn test_user_list_requires_admin() {
    let ctx = TestContext::new().await;
    register(&ctx, "alice", "long-password", "long-password").await;
    ctx.sign_in("alice", "long-password").await;

    let resp = ctx.get("/users").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(ctx.follow(&resp).await.contains("You must be an admin to do that."));
}

#[tokio::test]
async fn test_user_list_for_admin() {
    let ctx = TestContext::new().await;
    register(&ctx, "alice", "long-password", "long-password").await;
    ctx.sign_in_as_admin().await;

    let resp = ctx.get("/users").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("alice"));
    assert!(body.contains("admin"));
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let ctx = TestContext::new().await;
    register(&ctx, "alice", "long-password", "long-password").await;
    ctx.sign_in_as_admin().await;

    let resp = ctx.post("/users/alice/delete", &[]).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()["location"], "/users");
    assert!(ctx.follow(&resp).await.contains("alice was deleted."));
    assert!(!ctx.users_yaml().contains("alice"));
}

#[tokio::test]
async fn test_non_admin_cannot_delete_user() {
    let ctx = TestContext::new().await;
    register(&ctx, "alice", "long-password", "long-password").await;
    ctx.sign_in("alice", "long-password").await;

    let resp = ctx.post("/users/admin/delete", &[]).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(ctx.users_yaml().contains("admin"));
}
