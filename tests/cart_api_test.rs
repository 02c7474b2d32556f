mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp, DEFAULT_TEST_ADDRESS};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

const EMAIL: &str = "crio-user@example.com";

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => raw.parse().expect("decimal string"),
        Value::Number(num) => num.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {other}"),
    }
}

fn cart_uri(email: &str) -> String {
    format!("/api/v1/users/{email}/cart")
}

async fn register_with_address(app: &TestApp) {
    let response = app
        .request(
            Method::POST,
            "/api/v1/users",
            Some(json!({"name": "crio-user", "email": EMAIL})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{EMAIL}/address"),
            Some(json!({"address": DEFAULT_TEST_ADDRESS})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn create_product(app: &TestApp, name: &str, cost: &str) -> Uuid {
    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": name,
                "category": "Sports",
                "cost": cost,
                "rating": 5,
                "image": "https://images.example.com/item.png"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("product id in response")
}

#[tokio::test]
async fn full_purchase_flow_over_http() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let racquet = create_product(&app, "YONEX Smash Badminton Racquet", "100").await;
    let bottle = create_product(&app, "Stainless Steel Water Bottle", "50").await;

    let response = app
        .request(
            Method::POST,
            &cart_uri(EMAIL),
            Some(json!({"productId": racquet, "quantity": 1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            &cart_uri(EMAIL),
            Some(json!({"productId": bottle, "quantity": 1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::PUT,
            &cart_uri(EMAIL),
            Some(json!({"productId": racquet, "quantity": 2})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart = response_json(response).await;
    assert_eq!(cart["cartItems"].as_array().map(Vec::len), Some(2));
    assert_eq!(decimal(&cart["total"]), dec!(250));

    let response = app
        .request(Method::PUT, &format!("{}/checkout", cart_uri(EMAIL)), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::GET, &format!("/api/v1/users/{EMAIL}"), None)
        .await;
    let user = response_json(response).await;
    assert_eq!(decimal(&user["walletMoney"]), dec!(250));

    let response = app.request(Method::GET, &cart_uri(EMAIL), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart = response_json(response).await;
    assert_eq!(cart["cartItems"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn duplicate_add_returns_conflict() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let racquet = create_product(&app, "YONEX Smash Badminton Racquet", "100").await;
    let body = json!({"productId": racquet, "quantity": 1});

    let first = app.request(Method::POST, &cart_uri(EMAIL), Some(body.clone())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.request(Method::POST, &cart_uri(EMAIL), Some(body)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error = response_json(second).await;
    assert!(error["message"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Product already in cart"));
}

#[tokio::test]
async fn zero_quantity_add_is_a_bad_request() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let racquet = create_product(&app, "YONEX Smash Badminton Racquet", "100").await;

    let response = app
        .request(
            Method::POST,
            &cart_uri(EMAIL),
            Some(json!({"productId": racquet, "quantity": 0})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was created
    let response = app.request(Method::GET, &cart_uri(EMAIL), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_with_zero_quantity_removes_the_line() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let racquet = create_product(&app, "YONEX Smash Badminton Racquet", "100").await;

    app.request(
        Method::POST,
        &cart_uri(EMAIL),
        Some(json!({"productId": racquet, "quantity": 3})),
    )
    .await;

    let response = app
        .request(
            Method::PUT,
            &cart_uri(EMAIL),
            Some(json!({"productId": racquet, "quantity": 0})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cart = response_json(app.request(Method::GET, &cart_uri(EMAIL), None).await).await;
    assert_eq!(cart["cartItems"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn delete_route_removes_item() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let racquet = create_product(&app, "YONEX Smash Badminton Racquet", "100").await;

    app.request(
        Method::POST,
        &cart_uri(EMAIL),
        Some(json!({"productId": racquet, "quantity": 1})),
    )
    .await;

    let uri = format!("{}/items/{}", cart_uri(EMAIL), racquet);
    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_failures_map_to_client_errors() {
    let app = TestApp::new().await;
    register_with_address(&app).await;
    let television = create_product(&app, "Smart LED Television", "450").await;
    let checkout_uri = format!("{}/checkout", cart_uri(EMAIL));

    let response = app.request(Method::PUT, &checkout_uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.request(
        Method::POST,
        &cart_uri(EMAIL),
        Some(json!({"productId": television, "quantity": 2})),
    )
    .await;

    let response = app.request(Method::PUT, &checkout_uri, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response_json(response).await;
    assert_eq!(error["message"], "Wallet Balance is insufficient");
}

#[tokio::test]
async fn unknown_user_is_not_found_and_request_id_is_echoed() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::GET,
            &cart_uri("nobody@example.com"),
            None,
            &[("x-request-id", "test-request-42")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("test-request-42")
    );

    let error = response_json(response).await;
    assert_eq!(error["message"], "User not found");
    assert_eq!(error["request_id"], "test-request-42");
}

#[tokio::test]
async fn short_address_is_rejected() {
    let app = TestApp::new().await;
    app.seed_user(EMAIL, None).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{EMAIL}/address"),
            Some(json!({"address": "Too short"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert!(doc["paths"]
        .as_object()
        .is_some_and(|paths| paths.contains_key("/api/v1/users/{email}/cart/checkout")));
}
