//! Admin area gating and account management over HTTP.

use fyay_core::{EventId, OrderId, ProductId, UserId, UserRole};
use fyay_integration_tests::{TestApp, location};
use reqwest::StatusCode;

/// Every mutating admin route with a well-formed body.
fn mutations(
    product: ProductId,
    event_id: EventId,
    order_id: OrderId,
    user: UserId,
) -> Vec<(String, Vec<(&'static str, String)>)> {
    let product = product.to_string();
    let event = vec![
        ("event_name", "Gala".to_string()),
        ("description", "Annual gala".to_string()),
        ("location", "Main Hall".to_string()),
        ("event_date", "2031-06-14".to_string()),
        ("product_id", product.to_string()),
        ("quantity", "5".to_string()),
    ];
    let order = vec![
        ("product_name", "Chairs".to_string()),
        ("quantity", "4".to_string()),
        ("price_per_unit", "3.00".to_string()),
    ];
    vec![
        ("/admin/create_event".to_string(), event.clone()),
        ("/admin/manage_events".to_string(), event),
        ("/admin/orders".to_string(), order),
        (format!("/admin/delete_inventory/{product}"), Vec::new()),
        (format!("/admin/delete_user/{user}"), Vec::new()),
        (format!("/admin/delete_event/{event_id}"), Vec::new()),
        (format!("/admin/delete_order/{order_id}"), Vec::new()),
    ]
}

/// Seed one event and one order, fire every mutation, and check none landed.
async fn assert_nothing_changes(
    app: &TestApp,
    client: &reqwest::Client,
    admin: UserId,
    expected: &str,
) {
    let product = app.seed_product("Chairs", 10).await;
    let event_id = app.seed_event(admin, product, 3).await;
    let order_id = app.seed_order("Tables", 2, "3.00").await;
    let users_before = app.count("users").await;

    for (path, form) in mutations(product, event_id, order_id, admin) {
        let resp = client.post(app.url(&path)).form(&form).send().await.unwrap();
        assert_eq!(location(&resp), expected, "POST {path}");
    }

    assert_eq!(app.stock(product).await, Some(7));
    assert_eq!(app.count("events").await, 1);
    assert_eq!(app.count("orders").await, 1);
    assert_eq!(app.count("inventory_transactions").await, 2);
    assert_eq!(app.count("inventory").await, 2);
    assert_eq!(app.count("users").await, users_before);
}

#[tokio::test]
async fn test_anonymous_requests_are_redirected() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    let anonymous = TestApp::client();

    for path in ["/admin/dashboard", "/admin/inventory", "/admin/users", "/admin/orders"] {
        let resp = app.get(&anonymous, path).await;
        assert_eq!(location(&resp), "/", "GET {path}");
    }

    assert_nothing_changes(&app, &anonymous, admin, "/").await;
}

#[tokio::test]
async fn test_regular_users_are_denied() {
    let app = TestApp::spawn().await;
    let admin = app
        .seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    app.seed_account("Alice", "a@x.com", UserRole::User).await;

    let alice = TestApp::client();
    app.login(&alice, "a@x.com").await;

    let resp = app.get(&alice, "/admin/dashboard").await;
    assert_eq!(location(&resp), "/");
    let page = app.get(&alice, "/").await.text().await.unwrap();
    assert!(page.contains("Access denied."));

    assert_nothing_changes(&app, &alice, admin, "/").await;
}

#[tokio::test]
async fn test_admin_pages_render() {
    let app = TestApp::spawn().await;
    app.seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    app.seed_product("Chairs", 10).await;

    let admin = TestApp::client();
    app.login(&admin, "admin@fyay.test").await;

    for path in [
        "/admin/dashboard",
        "/admin/inventory",
        "/admin/users",
        "/admin/manage_events",
        "/admin/create_event",
        "/admin/orders",
    ] {
        let resp = app.get(&admin, path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let app = TestApp::spawn().await;
    let admin_id = app
        .seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    let alice_id = app.seed_account("Alice", "a@x.com", UserRole::User).await;

    let admin = TestApp::client();
    app.login(&admin, "admin@fyay.test").await;

    let resp = app
        .post(&admin, &format!("/admin/delete_user/{admin_id}"), &[])
        .await;
    assert_eq!(location(&resp), "/admin/users");
    assert_eq!(app.count("users").await, 2);

    let page = app.get(&admin, "/admin/users").await.text().await.unwrap();
    assert!(page.contains("You cannot delete your own account!"));

    let resp = app
        .post(&admin, &format!("/admin/delete_user/{alice_id}"), &[])
        .await;
    assert_eq!(location(&resp), "/admin/users");
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_deleted_admin_loses_access_immediately() {
    let app = TestApp::spawn().await;
    app.seed_account("Admin", "admin@fyay.test", UserRole::Admin)
        .await;
    let other_id = app
        .seed_account("Other", "other@fyay.test", UserRole::Admin)
        .await;

    let admin = TestApp::client();
    app.login(&admin, "admin@fyay.test").await;
    let other = TestApp::client();
    app.login(&other, "other@fyay.test").await;
    let resp = app.get(&other, "/admin/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .post(&admin, &format!("/admin/delete_user/{other_id}"), &[])
        .await;
    assert_eq!(location(&resp), "/admin/users");

    let resp = app.get(&other, "/admin/dashboard").await;
    assert_eq!(location(&resp), "/");
    let product = app.seed_product("Chairs", 10).await;
    let resp = app
        .post(&other, &format!("/admin/delete_inventory/{product}"), &[])
        .await;
    assert_eq!(location(&resp), "/");
    assert_eq!(app.stock(product).await, Some(10));

    // The session no longer carries an identity at all.
    let resp = app.get(&other, "/book_event/1").await;
    assert_eq!(location(&resp), "/login");
}
