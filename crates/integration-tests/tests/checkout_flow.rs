//! Integration tests for the public checkout flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied and the demo
//!   catalog seeded (jb-cli migrate && jb-cli seed)
//! - The server running (cargo run -p jabuticaba-server)
//! - Outbound access to the configured CEP directory for the quote tests
//!
//! Run with: cargo test -p jabuticaba-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use jabuticaba_integration_tests::{base_url, client};

// Assumes the demo seed: product 1 exists with price 79.90
const SEEDED_PRODUCT_ID: i32 = 1;
const SEEDED_PRODUCT_PRICE: f64 = 79.90;

fn order_payload(quantity: i32) -> Value {
    json!({
        "customerName": "Maria Silva",
        "email": "maria@example.com",
        "postalCode": "01310-100",
        "street": "Avenida Paulista",
        "number": "1000",
        "complement": "apto 42",
        "city": "São Paulo",
        "region": "SP",
        "shippingCost": 20.00,
        "cart": [
            {"id": SEEDED_PRODUCT_ID, "quantity": quantity, "price": SEEDED_PRODUCT_PRICE}
        ]
    })
}

#[tokio::test]
#[ignore = "Requires running server, database, and CEP directory access"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server, database, and CEP directory access"]
async fn test_quote_resolves_address_and_freight() {
    let resp = client()
        .post(format!("{}/api/checkout/quote", base_url()))
        .json(&json!({
            "postalCode": "01310-100",
            "cart": [{"id": 1, "quantity": 2, "price": 79.90}]
        }))
        .send()
        .await
        .expect("Failed to request quote");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse quote");

    assert_eq!(body["success"], true);
    assert_eq!(body["address"]["region"], "SP");
    assert_eq!(body["address"]["cep"], "01310-100");
    // SP base rate, 2 items, no surcharge
    assert_eq!(body["shipping"]["amount"], "20.00");
    assert!(body["shipping"]["leadTime"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_quote_rejects_malformed_cep() {
    let resp = client()
        .post(format!("{}/api/checkout/quote", base_url()))
        .json(&json!({"postalCode": "1310-100", "cart": []}))
        .send()
        .await
        .expect("Failed to request quote");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running server and CEP directory access"]
async fn test_quote_unknown_cep_is_not_found() {
    // Syntactically valid but unassigned
    let resp = client()
        .post(format!("{}/api/checkout/quote", base_url()))
        .json(&json!({"postalCode": "99999-999", "cart": []}))
        .send()
        .await
        .expect("Failed to request quote");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_place_order_returns_id_and_total() {
    let resp = client()
        .post(format!("{}/api/checkout/orders", base_url()))
        .json(&order_payload(1))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(body["success"], true);
    assert!(body["orderId"].is_number());
    // 1 x 79.90 + 20.00 shipping
    assert_eq!(body["total"], "99.90");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_place_order_rejects_missing_field() {
    let mut payload = order_payload(1);
    payload["email"] = json!("");

    let resp = client()
        .post(format!("{}/api/checkout/orders", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .expect("message should be a string")
            .contains("email")
    );
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_place_order_rejects_stale_price() {
    let mut payload = order_payload(1);
    payload["cart"][0]["price"] = json!(0.01);

    let resp = client()
        .post(format!("{}/api/checkout/orders", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_place_order_rejects_overselling() {
    let resp = client()
        .post(format!("{}/api/checkout/orders", base_url()))
        .json(&order_payload(1_000_000))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["success"], false);
}
