//! End-to-end tests for Fyay.
//!
//! Each test spawns the full application on an ephemeral port, backed by a
//! private in-memory store, and drives it over HTTP with a cookie-aware
//! client that does not follow redirects.
//!
//! ```bash
//! cargo test -p fyay-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower_sessions_sqlx_store::SqliteStore;

use fyay_core::{EventId, OrderId, ProductId, UserId, UserRole};
use fyay_web::config::AppConfig;
use fyay_web::db::{create_pool, schema};
use fyay_web::services::auth::AuthService;
use fyay_web::services::ledger::{InventoryLedger, NewEvent, NewOrder, OrderForm, RequestedItem};
use fyay_web::state::AppState;
use fyay_web::{middleware, routes};

/// Password given to every seeded account.
pub const PASSWORD: &str = "secret1";

/// A running application and a handle on its store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Start the application on `127.0.0.1:0` with every table created.
    pub async fn spawn() -> Self {
        let config = AppConfig::from_lookup(|_| None).expect("default configuration");
        let pool = create_pool(&SecretString::from("sqlite::memory:"), Duration::from_secs(5))
            .await
            .expect("in-memory pool");
        schema::create_tables(&pool).await.expect("create tables");

        let session_store = SqliteStore::new(pool.clone());
        session_store.migrate().await.expect("session table");
        let session_layer = middleware::create_session_layer(session_store, &config);

        let app = routes::app(AppState::new(config, pool.clone()), session_layer);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        Self { addr, pool }
    }

    /// Absolute URL for a path on this app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh browser: its own cookie jar, redirects left to the caller.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("HTTP client")
    }

    pub async fn get(&self, client: &Client, path: &str) -> Response {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post(&self, client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// Create an account directly in the store.
    pub async fn seed_account(&self, name: &str, email: &str, role: UserRole) -> UserId {
        AuthService::new(&self.pool)
            .create_account(name, email, PASSWORD, role)
            .await
            .expect("seed account")
            .id
    }

    /// Insert a product priced at 2.50.
    pub async fn seed_product(&self, name: &str, quantity: i64) -> ProductId {
        sqlx::query_scalar(
            "INSERT INTO inventory (product_name, quantity, price_per_unit) \
             VALUES (?, ?, '2.50') RETURNING id",
        )
        .bind(name)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .expect("seed product")
    }

    /// Create an event through the ledger, reserving `quantity` of `product`.
    pub async fn seed_event(&self, created_by: UserId, product: ProductId, quantity: i64) -> EventId {
        let request = NewEvent {
            name: "Seeded".into(),
            description: "Seeded event".into(),
            location: "Hall".into(),
            date: "2031-01-01".into(),
            items: vec![RequestedItem {
                product_id: product,
                quantity: Some(quantity),
            }],
            ..NewEvent::default()
        };
        InventoryLedger::new(&self.pool)
            .create_event(created_by, &request)
            .await
            .expect("seed event")
    }

    /// Place a stock order through the ledger.
    pub async fn seed_order(&self, product_name: &str, quantity: i64, price: &str) -> OrderId {
        let order = NewOrder::parse(&OrderForm {
            product_name: product_name.into(),
            quantity: quantity.to_string(),
            price_per_unit: price.into(),
            description: String::new(),
        })
        .expect("valid order");
        InventoryLedger::new(&self.pool)
            .place_order(&order)
            .await
            .expect("seed order")
    }

    /// Log `client` in, asserting the redirect to the home page.
    pub async fn login(&self, client: &Client, email: &str) {
        let resp = self
            .post(client, "/login", &[("email", email), ("password", PASSWORD)])
            .await;
        assert_eq!(location(&resp), "/", "login as {email} should succeed");
    }

    pub async fn stock(&self, id: ProductId) -> Option<i64> {
        sqlx::query_scalar("SELECT quantity FROM inventory WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .expect("read stock")
    }

    /// Row count of a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count rows")
    }
}

/// The redirect target of a `303 See Other` response.
#[must_use]
pub fn location(resp: &Response) -> &str {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "expected a redirect");
    resp.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Location header")
}
