//! Registration, login, and logout over HTTP.

use fyay_core::UserRole;
use fyay_integration_tests::{PASSWORD, TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = app.get(&client, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = app.get(&client, "/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::spawn().await;
    let resp = app.get(&TestApp::client(), "/no-such-page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_account("Alice", "a@x.com", UserRole::User).await;

    let client = TestApp::client();
    let resp = app
        .post(
            &client,
            "/register",
            &[("full_name", "Other Alice"), ("email", "a@x.com"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(location(&resp), "/register");
    assert_eq!(app.count("users").await, 1);

    let page = app.get(&client, "/register").await.text().await.unwrap();
    assert!(page.contains("Email already registered."));
}

#[tokio::test]
async fn test_registration_lists_every_invalid_field() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = app
        .post(
            &client,
            "/register",
            &[("full_name", ""), ("email", "not-an-email"), ("password", "abc")],
        )
        .await;
    assert_eq!(location(&resp), "/register");
    assert_eq!(app.count("users").await, 0);

    let page = app.get(&client, "/register").await.text().await.unwrap();
    assert!(page.contains("Full Name is required."));
    assert!(page.contains("flash-danger"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_account("Alice", "a@x.com", UserRole::User).await;

    let client = TestApp::client();
    let resp = app
        .post(&client, "/login", &[("email", "a@x.com"), ("password", "wrong-password")])
        .await;
    assert_eq!(location(&resp), "/login");

    let page = app.get(&client, "/login").await.text().await.unwrap();
    assert!(page.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::spawn().await;
    app.seed_account("Alice", "a@x.com", UserRole::User).await;

    let client = TestApp::client();
    app.login(&client, "a@x.com").await;
    let resp = app.get(&client, "/book_event/1").await;
    assert_ne!(location(&resp), "/login");

    let resp = app.get(&client, "/logout").await;
    assert_eq!(location(&resp), "/");

    let resp = app.get(&client, "/book_event/1").await;
    assert_eq!(location(&resp), "/login");
}
