//! Integration tests for checkout conversion.
//!
//! Same requirements as the cart tests: migrated + seeded database, both
//! binaries running, `ADMIN_EMAIL` / `ADMIN_PASSWORD` in the environment.

#![allow(clippy::expect_used)]

use rust_decimal::Decimal;
use serde_json::{Value, json};

use sugar_plum_integration_tests::{
    admin_base_url, admin_login, client, create_product, product_id, register_shopper,
    storefront_base_url,
};

async fn add_to_cart(shopper: &reqwest::Client, id: i64) {
    let resp = shopper
        .post(format!("{}/cart/add", storefront_base_url()))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), 200);
}

async fn checkout(shopper: &reqwest::Client) -> reqwest::Response {
    shopper
        .post(format!("{}/checkout", storefront_base_url()))
        .send()
        .await
        .expect("checkout request failed")
}

async fn cart(shopper: &reqwest::Client) -> Value {
    shopper
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("invalid cart JSON")
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn empty_cart_checkout_fails_without_state_change() {
    let shopper = client();
    register_shopper(&shopper, "empty-checkout").await;

    let resp = checkout(&shopper).await;
    assert_eq!(resp.status(), 422);

    // No order was created
    let orders: Value = shopper
        .get(format!("{}/orders", storefront_base_url()))
        .send()
        .await
        .expect("orders request failed")
        .json()
        .await
        .expect("invalid orders JSON");
    assert!(orders.as_array().expect("orders array").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn checkout_snapshots_lines_and_empties_the_cart() {
    let admin = client();
    admin_login(&admin).await;
    let a = product_id(&create_product(&admin, "Checkout Plum A", "10.00").await);
    let b = product_id(&create_product(&admin, "Checkout Plum B", "5.00").await);

    let shopper = client();
    register_shopper(&shopper, "checkout").await;
    add_to_cart(&shopper, a).await;
    add_to_cart(&shopper, a).await;
    add_to_cart(&shopper, b).await;

    let pre_checkout_lines = cart(&shopper).await["items"]
        .as_array()
        .expect("items array")
        .len();

    let resp = checkout(&shopper).await;
    assert_eq!(resp.status(), 201);
    let order: Value = resp.json().await.expect("invalid order JSON");

    // order.lines count == pre-checkout cart line count
    let lines = order["lines"].as_array().expect("lines array");
    assert_eq!(lines.len(), pre_checkout_lines);
    assert_eq!(lines.len(), 2);

    let total: Decimal = order["total"]
        .as_str()
        .expect("total string")
        .parse()
        .expect("total decimal");
    assert_eq!(total, Decimal::new(2500, 2));

    // post-checkout cart is empty
    let cart = cart(&shopper).await;
    assert!(cart["items"].as_array().expect("items array").is_empty());

    // the order is in the history
    let orders: Value = shopper
        .get(format!("{}/orders", storefront_base_url()))
        .send()
        .await
        .expect("orders request failed")
        .json()
        .await
        .expect("invalid orders JSON");
    assert_eq!(orders.as_array().expect("orders array").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn second_checkout_finds_an_empty_cart() {
    let admin = client();
    admin_login(&admin).await;
    let id = product_id(&create_product(&admin, "Double Checkout Plum", "7.00").await);

    let shopper = client();
    register_shopper(&shopper, "double").await;
    add_to_cart(&shopper, id).await;

    let first = checkout(&shopper).await;
    assert_eq!(first.status(), 201);

    // The cart was cleared atomically with the order, so a duplicate
    // submission converts nothing.
    let second = checkout(&shopper).await;
    assert_eq!(second.status(), 422);

    let orders: Value = shopper
        .get(format!("{}/orders", storefront_base_url()))
        .send()
        .await
        .expect("orders request failed")
        .json()
        .await
        .expect("invalid orders JSON");
    assert_eq!(orders.as_array().expect("orders array").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn order_snapshots_survive_later_price_edits() {
    let admin = client();
    admin_login(&admin).await;
    let product = create_product(&admin, "Snapshot Plum", "10.00").await;
    let id = product_id(&product);

    let shopper = client();
    register_shopper(&shopper, "snapshot").await;
    add_to_cart(&shopper, id).await;

    let resp = checkout(&shopper).await;
    assert_eq!(resp.status(), 201);
    let order: Value = resp.json().await.expect("invalid order JSON");
    let order_id = order["id"].as_i64().expect("order id");

    // The owner raises the price after the order was placed
    let update = admin
        .put(format!("{}/products/{id}", admin_base_url()))
        .json(&json!({ "price": "99.00" }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(update.status(), 200);

    // The order still shows the checkout-time price
    let fetched: Value = shopper
        .get(format!("{}/orders/{order_id}", storefront_base_url()))
        .send()
        .await
        .expect("order request failed")
        .json()
        .await
        .expect("invalid order JSON");
    let unit_price: Decimal = fetched["lines"][0]["unit_price"]
        .as_str()
        .expect("unit price string")
        .parse()
        .expect("unit price decimal");
    assert_eq!(unit_price, Decimal::new(1000, 2));
}
