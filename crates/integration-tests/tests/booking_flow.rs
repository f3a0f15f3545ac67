//! Registration, event creation, and booking over HTTP.

use fyay_core::UserRole;
use fyay_integration_tests::{PASSWORD, TestApp, location};

const GALA_DATE: &str = "2031-06-14";

#[tokio::test]
async fn test_register_login_book_marks_event_applied() {
    let app = TestApp::spawn().await;
    app.seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    let chairs = app.seed_product("Chairs", 10).await;

    // Alice registers and logs in
    let alice = TestApp::client();
    let resp = app
        .post(
            &alice,
            "/register",
            &[("full_name", "Alice"), ("email", "a@x.com"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(location(&resp), "/login");
    app.login(&alice, "a@x.com").await;

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE email = 'a@x.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(role, "user");

    let page = app.get(&alice, "/events").await.text().await.unwrap();
    assert!(!page.contains("badge-applied"));

    // The admin creates Gala, reserving five chairs
    let admin = TestApp::client();
    app.login(&admin, "admin@fyay.test").await;
    let chairs_id = chairs.to_string();
    let resp = app
        .post(
            &admin,
            "/admin/create_event",
            &[
                ("event_name", "Gala"),
                ("description", "Annual gala"),
                ("location", "Main Hall"),
                ("event_date", GALA_DATE),
                ("product_id", chairs_id.as_str()),
                ("quantity", "5"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/admin/dashboard");
    assert_eq!(app.stock(chairs).await, Some(5));
    assert_eq!(app.count("inventory_transactions").await, 1);

    let gala: i64 = sqlx::query_scalar("SELECT id FROM events WHERE event_name = 'Gala'")
        .fetch_one(&app.pool)
        .await
        .unwrap();

    // Alice books it on the event date
    let book_path = format!("/book_event/{gala}");
    let resp = app.get(&alice, &book_path).await;
    assert!(resp.status().is_success());
    let resp = app
        .post(
            &alice,
            &book_path,
            &[("hours", "3"), ("date", GALA_DATE), ("description", "")],
        )
        .await;
    assert_eq!(location(&resp), "/");
    assert_eq!(app.count("purchases").await, 1);

    let page = app.get(&alice, "/events").await.text().await.unwrap();
    assert!(page.contains("Gala"));
    assert!(page.contains("badge-applied"));

    // Nobody else sees it as applied
    let page = app.get(&admin, "/events").await.text().await.unwrap();
    assert!(!page.contains("badge-applied"));
}

#[tokio::test]
async fn test_booking_before_event_date_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.seed_account("Bob", "bob@x.com", UserRole::User).await;
    let event: i64 = sqlx::query_scalar(
        "INSERT INTO events (event_name, description, location, date, created_by) \
         VALUES ('Gala', 'Annual gala', 'Main Hall', ?, ?) RETURNING id",
    )
    .bind(GALA_DATE)
    .bind(user)
    .fetch_one(&app.pool)
    .await
    .unwrap();

    let bob = TestApp::client();
    app.login(&bob, "bob@x.com").await;

    let book_path = format!("/book_event/{event}");
    let resp = app
        .post(&bob, &book_path, &[("hours", "2"), ("date", "2031-06-13")])
        .await;
    assert_eq!(location(&resp), book_path);
    assert_eq!(app.count("purchases").await, 0);

    let page = app.get(&bob, &book_path).await.text().await.unwrap();
    assert!(page.contains("You cannot apply for an event scheduled in the past."));
}

#[tokio::test]
async fn test_booking_requires_login() {
    let app = TestApp::spawn().await;
    let anonymous = TestApp::client();

    let resp = app.get(&anonymous, "/book_event/1").await;
    assert_eq!(location(&resp), "/login");

    let resp = app
        .post(&anonymous, "/book_event/1", &[("hours", "2"), ("date", GALA_DATE)])
        .await;
    assert_eq!(location(&resp), "/login");
    assert_eq!(app.count("purchases").await, 0);
}
