//! Integration tests for admin catalog management.
//!
//! Same requirements as the storefront tests: migrated + seeded database,
//! both binaries running, `ADMIN_EMAIL` / `ADMIN_PASSWORD` in the
//! environment (an editor-role account, e.g. the one `sp-cli seed` creates).

#![allow(clippy::expect_used)]

use rust_decimal::Decimal;
use serde_json::{Value, json};

use sugar_plum_integration_tests::{
    admin_base_url, admin_login, client, create_product, product_id, register_shopper,
    storefront_base_url,
};

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn catalog_mutations_require_login() {
    let anonymous = client();
    let resp = anonymous
        .post(format!("{}/products", admin_base_url()))
        .json(&json!({ "title": "Nope", "price": "1.00" }))
        .send()
        .await
        .expect("create request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn product_crud_roundtrip() {
    let admin = client();
    admin_login(&admin).await;

    // Create
    let product = create_product(&admin, "CRUD Plum", "6.00").await;
    let id = product_id(&product);
    assert_eq!(product["title"], "CRUD Plum");

    // Update mutable fields
    let updated: Value = admin
        .put(format!("{}/products/{id}", admin_base_url()))
        .json(&json!({ "title": "CRUD Plum (ripe)", "price": "6.50" }))
        .send()
        .await
        .expect("update request failed")
        .json()
        .await
        .expect("invalid product JSON");
    assert_eq!(updated["title"], "CRUD Plum (ripe)");
    assert_eq!(updated["price"], "6.50");

    // The storefront sees the update
    let public: Value = client()
        .get(format!("{}/products/{id}", storefront_base_url()))
        .send()
        .await
        .expect("storefront request failed")
        .json()
        .await
        .expect("invalid product JSON");
    assert_eq!(public["title"], "CRUD Plum (ripe)");

    // Delete
    let deleted = admin
        .delete(format!("{}/products/{id}", admin_base_url()))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(deleted.status(), 200);

    // Gone from the admin catalog
    let resp = admin
        .get(format!("{}/products/{id}", admin_base_url()))
        .send()
        .await
        .expect("get request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn negative_prices_are_rejected() {
    let admin = client();
    admin_login(&admin).await;

    let resp = admin
        .post(format!("{}/products", admin_base_url()))
        .json(&json!({ "title": "Anti Plum", "price": "-1.00" }))
        .send()
        .await
        .expect("create request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running storefront/admin and a seeded database"]
async fn deleting_a_product_prunes_it_from_carts() {
    let admin = client();
    admin_login(&admin).await;
    let id = product_id(&create_product(&admin, "Pruned Plum", "3.00").await);

    // A shopper puts the product in their cart
    let shopper = client();
    register_shopper(&shopper, "prune").await;
    let add = shopper
        .post(format!("{}/cart/add", storefront_base_url()))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(add.status(), 200);

    // The owner deletes the product
    let resp = admin
        .delete(format!("{}/products/{id}", admin_base_url()))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid delete JSON");
    assert!(
        body["pruned_cart_lines"].as_u64().expect("pruned count") >= 1,
        "the shopper's cart line must be pruned"
    );

    // The shopper's cart no longer references it
    let cart: Value = shopper
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("invalid cart JSON");
    assert!(cart["items"].as_array().expect("items array").is_empty());
    let subtotal: Decimal = cart["subtotal"]
        .as_str()
        .expect("subtotal string")
        .parse()
        .expect("subtotal decimal");
    assert_eq!(subtotal, Decimal::ZERO);
}
