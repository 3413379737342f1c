//! Shared helpers for Sugar Plum integration tests.
//!
//! # Running Tests
//!
//! The tests drive the real binaries over HTTP, so they are `#[ignore]`d by
//! default. To run them:
//!
//! ```bash
//! # Migrate and seed the database, then start both binaries
//! cargo run -p sugar-plum-cli -- migrate
//! cargo run -p sugar-plum-cli -- seed -e demo@sugarplumhq.dev -p <password>
//! cargo run -p sugar-plum-storefront &
//! cargo run -p sugar-plum-admin &
//!
//! # Run the ignored tests with admin credentials in the environment
//! ADMIN_EMAIL=demo@sugarplumhq.dev ADMIN_PASSWORD=<password> \
//!     cargo test -p sugar-plum-integration-tests -- --ignored
//! ```

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Admin credentials for catalog setup, from `ADMIN_EMAIL` / `ADMIN_PASSWORD`
/// (the account `sp-cli seed` creates).
///
/// # Panics
///
/// Panics if the variables are missing - the tests cannot run without them.
#[must_use]
#[allow(clippy::expect_used)]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");
    (email, password)
}

/// Create an HTTP client with a cookie store (sessions live in cookies).
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique shopper email so repeated runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", uuid::Uuid::new_v4())
}

/// Register a fresh shopper; the client's cookie jar holds the session
/// afterwards. Returns the email used.
///
/// # Panics
///
/// Panics if registration does not return 201.
#[allow(clippy::expect_used)]
pub async fn register_shopper(client: &Client, prefix: &str) -> String {
    let email = unique_email(prefix);
    let resp = client
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&json!({ "email": email, "password": "plum-basket-9" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 201, "shopper registration failed");
    email
}

/// Log the admin client in with the seeded credentials.
///
/// # Panics
///
/// Panics if the login does not return 200.
#[allow(clippy::expect_used)]
pub async fn admin_login(client: &Client) {
    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("admin login request failed");
    assert_eq!(resp.status(), 200, "admin login failed");
}

/// Create a product through the admin API, returning its JSON body.
///
/// # Panics
///
/// Panics if the create does not return 201.
#[allow(clippy::expect_used)]
pub async fn create_product(admin: &Client, title: &str, price: &str) -> Value {
    let resp = admin
        .post(format!("{}/products", admin_base_url()))
        .json(&json!({
            "title": title,
            "description": "integration test product",
            "image_url": "/images/test.jpg",
            "price": price,
        }))
        .send()
        .await
        .expect("create product request failed");
    assert_eq!(resp.status(), 201, "product creation failed");
    resp.json().await.expect("invalid product JSON")
}

/// Extract a product id from a create-product response body.
///
/// # Panics
///
/// Panics if the body has no numeric `id`.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product_id(body: &Value) -> i64 {
    body["id"].as_i64().expect("product id missing")
}
