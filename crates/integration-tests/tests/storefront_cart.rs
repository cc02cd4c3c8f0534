//! Integration tests for the session-scoped cart routes.
//!
//! Each `TestServer` client keeps cookies, so consecutive requests share one
//! session and one cart. A second client gets a separate cart.

use cosmopolitan_integration_tests::TestServer;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn post_json(server: &TestServer, path: &str, body: &Value) -> Value {
    let resp = server
        .client
        .post(server.url(path))
        .json(body)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(resp.status(), StatusCode::OK, "POST {path} failed");
    resp.json().await.expect("JSON body")
}

async fn get_json(server: &TestServer, path: &str) -> Value {
    let resp = server
        .client
        .get(server.url(path))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(resp.status(), StatusCode::OK, "GET {path} failed");
    resp.json().await.expect("JSON body")
}

fn shirt() -> Value {
    json!({
        "id": 1001,
        "title": "Linen Shirt",
        "unitPrice": "10",
        "image": "https://cdn.example.com/products/linen-shirt.jpg",
        "variantAttributes": {"Size": "M"}
    })
}

fn tote() -> Value {
    json!({"id": "tote-natural", "title": "Canvas Tote", "unitPrice": 5})
}

// ============================================================================
// Reading
// ============================================================================

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let server = TestServer::with_fixture().await;

    let cart = get_json(&server, "/cart").await;

    assert_eq!(cart, json!({"items": [], "count": 0, "total": "0"}));
    assert_eq!(get_json(&server, "/cart/count").await, json!({"count": 0}));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_add_creates_line_with_quantity_one() {
    let server = TestServer::with_fixture().await;

    let cart = post_json(&server, "/cart/add", &shirt()).await;

    assert_eq!(cart["count"], 1);
    assert_eq!(cart["total"], "10");
    assert_eq!(cart["items"][0]["id"], 1001);
    assert_eq!(cart["items"][0]["quantity"], 1);
    assert_eq!(cart["items"][0]["variantAttributes"]["Size"], "M");
}

#[tokio::test]
async fn test_add_same_id_increments_quantity() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    let cart = post_json(&server, "/cart/add", &shirt()).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["count"], 2);
}

#[tokio::test]
async fn test_add_existing_id_keeps_first_price() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    let mut repriced = shirt();
    repriced["unitPrice"] = json!("99");
    let cart = post_json(&server, "/cart/add", &repriced).await;

    assert_eq!(cart["items"][0]["unitPrice"], "10");
    assert_eq!(cart["total"], "20");
}

#[tokio::test]
async fn test_total_sums_price_times_quantity() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    post_json(&server, "/cart/add", &tote()).await;
    let cart = post_json(&server, "/cart/update", &json!({"id": 1001, "quantity": 3})).await;

    assert_eq!(cart["count"], 4);
    assert_eq!(cart["total"], "35");
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    post_json(&server, "/cart/add", &tote()).await;
    let cart = post_json(
        &server,
        "/cart/update",
        &json!({"id": "tote-natural", "quantity": 0}),
    )
    .await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["id"], 1001);
}

#[tokio::test]
async fn test_update_negative_removes_line() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    let cart = post_json(&server, "/cart/update", &json!({"id": 1001, "quantity": -5})).await;

    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["count"], 0);
}

#[tokio::test]
async fn test_update_unknown_id_is_noop() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    let cart = post_json(&server, "/cart/update", &json!({"id": 7, "quantity": 4})).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["count"], 1);
}

#[tokio::test]
async fn test_numeric_and_string_ids_are_distinct() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    let cart = post_json(&server, "/cart/remove", &json!({"id": "1001"})).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_remove() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;
    post_json(&server, "/cart/add", &tote()).await;
    let cart = post_json(&server, "/cart/remove", &json!({"id": 1001})).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["id"], "tote-natural");
    assert_eq!(get_json(&server, "/cart/count").await, json!({"count": 1}));
}

#[tokio::test]
async fn test_invalid_price_is_rejected() {
    let server = TestServer::with_fixture().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .json(&json!({"id": 1, "title": "Mystery", "unitPrice": "free"}))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(get_json(&server, "/cart").await["count"], 0);
}

#[tokio::test]
async fn test_out_of_range_price_is_rejected() {
    let server = TestServer::with_fixture().await;

    for price in [json!("1e20"), json!("79228162514264337593543950335"), json!(1e20)] {
        let resp = server
            .client
            .post(server.url("/cart/add"))
            .json(&json!({"id": 1, "title": "Priceless", "unitPrice": price}))
            .send()
            .await
            .expect("request succeeds");

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_largest_price_and_quantity_keep_cart_readable() {
    let server = TestServer::with_fixture().await;

    post_json(
        &server,
        "/cart/add",
        &json!({"id": 1, "title": "Yacht", "unitPrice": "1000000000000"}),
    )
    .await;
    let cart = post_json(
        &server,
        "/cart/update",
        &json!({"id": 1, "quantity": 1_000_000_000_000_i64}),
    )
    .await;

    assert_eq!(cart["items"][0]["quantity"], u32::MAX);
    assert_eq!(cart["total"], "4294967295000000000000");

    let cart = get_json(&server, "/cart").await;
    assert_eq!(cart["total"], "4294967295000000000000");
}

// ============================================================================
// Session isolation
// ============================================================================

#[tokio::test]
async fn test_carts_are_per_session() {
    let server = TestServer::with_fixture().await;

    post_json(&server, "/cart/add", &shirt()).await;

    let stranger = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");
    let cart: Value = stranger
        .get(server.url("/cart"))
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("JSON body");

    assert_eq!(cart["count"], 0);
    assert_eq!(get_json(&server, "/cart").await["count"], 1);
}

#[tokio::test]
async fn test_unchanged_cart_does_not_start_a_session() {
    let server = TestServer::with_fixture().await;

    for (path, body) in [
        ("/cart/update", json!({"id": 1, "quantity": 3})),
        ("/cart/remove", json!({"id": 1})),
    ] {
        let resp = server
            .client
            .post(server.url(path))
            .json(&body)
            .send()
            .await
            .expect("request succeeds");

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            resp.headers().get("set-cookie").is_none(),
            "{path} on an empty cart set a session cookie"
        );
    }

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .json(&shirt())
        .send()
        .await
        .expect("request succeeds");
    assert!(resp.headers().get("set-cookie").is_some());
}

#[tokio::test]
async fn test_shared_session_sees_each_completed_write() {
    let server = TestServer::with_fixture().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .json(&shirt())
        .send()
        .await
        .expect("request succeeds");
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();

    // A second tab on the same session.
    let tab = Client::new();
    let resp = tab
        .post(server.url("/cart/add"))
        .header("cookie", &cookie)
        .json(&tote())
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(resp.status(), StatusCode::OK);

    post_json(&server, "/cart/update", &json!({"id": 1001, "quantity": 2})).await;

    let cart: Value = tab
        .get(server.url("/cart"))
        .header("cookie", &cookie)
        .send()
        .await
        .expect("request succeeds")
        .json()
        .await
        .expect("JSON body");
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["total"], "25");
}
