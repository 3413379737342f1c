//! Integration tests for cart aggregation.
//!
//! These tests require:
//! - A migrated, seeded `PostgreSQL` database (sp-cli migrate / seed)
//! - The storefront running (cargo run -p sugar-plum-storefront)
//! - The admin panel running (cargo run -p sugar-plum-admin)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` set to the seeded admin credentials

#![allow(clippy::expect_used)]

use rust_decimal::Decimal;
use serde_json::{Value, json};

use sugar_plum_integration_tests::{
    admin_login, client, create_product, product_id, register_shopper, storefront_base_url,
};

async fn cart(shopper: &reqwest::Client) -> Value {
    let resp = shopper
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), 200);
    resp.json().await.expect("invalid cart JSON")
}

async fn add_to_cart(shopper: &reqwest::Client, id: i64) -> reqwest::Response {
    shopper
        .post(format!("{}/cart/add", storefront_base_url()))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .expect("add request failed")
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn cart_requires_login() {
    let anonymous = client();
    let resp = anonymous
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn repeated_adds_merge_into_one_line() {
    let admin = client();
    admin_login(&admin).await;
    let product = create_product(&admin, "Merge Test Plum", "10.00").await;
    let id = product_id(&product);

    let shopper = client();
    register_shopper(&shopper, "merge").await;

    let first = add_to_cart(&shopper, id).await;
    assert_eq!(first.status(), 200);
    let body: Value = first.json().await.expect("invalid add JSON");
    assert_eq!(body["quantity"], 1);

    let second = add_to_cart(&shopper, id).await;
    let body: Value = second.json().await.expect("invalid add JSON");
    assert_eq!(body["quantity"], 2);

    let cart = cart(&shopper).await;
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1, "duplicate adds must merge, not append");
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn removing_an_absent_product_is_a_noop() {
    let admin = client();
    admin_login(&admin).await;
    let product = create_product(&admin, "Noop Removal Plum", "4.50").await;
    let id = product_id(&product);

    let shopper = client();
    register_shopper(&shopper, "noop").await;
    add_to_cart(&shopper, id).await;
    let before = cart(&shopper).await;

    // Remove a product that was never added
    let resp = shopper
        .post(format!("{}/cart/remove", storefront_base_url()))
        .json(&json!({ "product_id": id + 999_999 }))
        .send()
        .await
        .expect("remove request failed");
    assert_eq!(resp.status(), 200);

    let after = cart(&shopper).await;
    assert_eq!(before["items"], after["items"], "cart must be unchanged");
    assert_eq!(before["subtotal"], after["subtotal"]);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn add_add_remove_leaves_no_line() {
    let admin = client();
    admin_login(&admin).await;
    let product = create_product(&admin, "Add Add Remove Plum", "3.25").await;
    let id = product_id(&product);

    let shopper = client();
    register_shopper(&shopper, "aar").await;
    add_to_cart(&shopper, id).await;
    add_to_cart(&shopper, id).await;

    let resp = shopper
        .post(format!("{}/cart/remove", storefront_base_url()))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .expect("remove request failed");
    assert_eq!(resp.status(), 200);

    let cart = cart(&shopper).await;
    assert!(
        cart["items"].as_array().expect("items array").is_empty(),
        "remove deletes the whole line, not one unit"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn totals_follow_the_worked_example() {
    // {A: qty 2 @ $10, B: qty 1 @ $5} -> subtotal 25
    let admin = client();
    admin_login(&admin).await;
    let a = product_id(&create_product(&admin, "Example Plum A", "10.00").await);
    let b = product_id(&create_product(&admin, "Example Plum B", "5.00").await);

    let shopper = client();
    register_shopper(&shopper, "example").await;
    add_to_cart(&shopper, a).await;
    add_to_cart(&shopper, a).await;
    add_to_cart(&shopper, b).await;

    let cart = cart(&shopper).await;
    let subtotal: Decimal = cart["subtotal"]
        .as_str()
        .expect("subtotal string")
        .parse()
        .expect("subtotal decimal");
    assert_eq!(subtotal, Decimal::new(2500, 2));
    assert_eq!(cart["item_count"], 3);

    let count: Value = shopper
        .get(format!("{}/cart/count", storefront_base_url()))
        .send()
        .await
        .expect("count request failed")
        .json()
        .await
        .expect("invalid count JSON");
    assert_eq!(count["count"], 3);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn adding_an_unknown_product_is_not_found() {
    let shopper = client();
    register_shopper(&shopper, "unknown").await;

    let resp = add_to_cart(&shopper, 2_000_000_000).await;
    assert_eq!(resp.status(), 404);

    let cart = cart(&shopper).await;
    assert!(cart["items"].as_array().expect("items array").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn clear_empties_the_cart() {
    let admin = client();
    admin_login(&admin).await;
    let id = product_id(&create_product(&admin, "Clear Test Plum", "2.00").await);

    let shopper = client();
    register_shopper(&shopper, "clear").await;
    add_to_cart(&shopper, id).await;

    let resp = shopper
        .post(format!("{}/cart/clear", storefront_base_url()))
        .send()
        .await
        .expect("clear request failed");
    assert_eq!(resp.status(), 204);

    let cart = cart(&shopper).await;
    assert!(cart["items"].as_array().expect("items array").is_empty());
    assert_eq!(cart["item_count"], 0);
}
