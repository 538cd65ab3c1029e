//! Integration tests for the admin order API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied and the demo
//!   catalog seeded (jb-cli migrate && jb-cli seed)
//! - The server running (cargo run -p jabuticaba-server)
//! - `JABUTICABA_ADMIN_TOKEN` set to the server's token
//!
//! Run with: cargo test -p jabuticaba-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use jabuticaba_integration_tests::{admin_token, base_url, client};

/// Place an order through the public API and return its id.
async fn place_test_order() -> i64 {
    let resp = client()
        .post(format!("{}/api/checkout/orders", base_url()))
        .json(&json!({
            "customerName": "João Pereira",
            "email": "joao@example.com",
            "postalCode": "01310-100",
            "street": "Avenida Paulista",
            "number": "1000",
            "city": "São Paulo",
            "region": "SP",
            "shippingCost": 20.00,
            "cart": [{"id": 1, "quantity": 1, "price": 79.90}]
        }))
        .send()
        .await
        .expect("Failed to place test order");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["orderId"].as_i64().expect("orderId should be a number")
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_admin_requires_token() {
    let resp = client()
        .get(format!("{}/api/admin/orders", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client()
        .get(format!("{}/api/admin/orders", base_url()))
        .bearer_auth("definitely-not-the-token")
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_order_list_and_status_filter() {
    place_test_order().await;

    let resp = client()
        .get(format!("{}/api/admin/orders", base_url()))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to list orders");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse list");
    assert_eq!(body["success"], true);
    assert!(body["count"].as_u64().expect("count") >= 1);

    // Fresh orders are pending
    let resp = client()
        .get(format!("{}/api/admin/orders?status=pending", base_url()))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to list orders");

    let body: Value = resp.json().await.expect("Failed to parse list");
    for order in body["orders"].as_array().expect("orders array") {
        assert_eq!(order["status"], "pending");
    }

    // Unknown filter values are rejected
    let resp = client()
        .get(format!("{}/api/admin/orders?status=shipped-ish", base_url()))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to list orders");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_order_detail_lines_are_stable() {
    let order_id = place_test_order().await;
    let url = format!("{}/api/admin/orders/{order_id}", base_url());

    let first: Value = client()
        .get(&url)
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to fetch detail")
        .json()
        .await
        .expect("Failed to parse detail");

    assert_eq!(first["success"], true);
    assert_eq!(first["order"]["id"].as_i64(), Some(order_id));
    assert_eq!(first["lines"].as_array().map(Vec::len), Some(1));

    // Re-reading returns the same line set every time
    let second: Value = client()
        .get(&url)
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to fetch detail")
        .json()
        .await
        .expect("Failed to parse detail");

    assert_eq!(first["lines"], second["lines"]);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_status_update_walks_the_chain() {
    let order_id = place_test_order().await;
    let url = format!("{}/api/admin/orders/{order_id}/status", base_url());

    for (from, to) in [("pending", "paid"), ("paid", "shipped"), ("shipped", "delivered")] {
        let resp = client()
            .put(&url)
            .bearer_auth(admin_token())
            .json(&json!({"status": to}))
            .send()
            .await
            .expect("Failed to update status");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse response");
        assert_eq!(body["from"], from);
        assert_eq!(body["to"], to);
    }

    // Delivered is terminal
    let resp = client()
        .put(&url)
        .bearer_auth(admin_token())
        .json(&json!({"status": "cancelled"}))
        .send()
        .await
        .expect("Failed to update status");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_status_update_rejects_unknown_value() {
    let order_id = place_test_order().await;
    let url = format!("{}/api/admin/orders/{order_id}/status", base_url());

    let resp = client()
        .put(&url)
        .bearer_auth(admin_token())
        .json(&json!({"status": "shipped-ish"}))
        .send()
        .await
        .expect("Failed to update status");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The stored status must be untouched
    let detail: Value = client()
        .get(format!("{}/api/admin/orders/{order_id}", base_url()))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to fetch detail")
        .json()
        .await
        .expect("Failed to parse detail");

    assert_eq!(detail["order"]["status"], "pending");
}
