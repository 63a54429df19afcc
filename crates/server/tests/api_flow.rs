use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::build_router;
use server::AppState;

fn app() -> Router {
    build_router(AppState::new(true), CorsLayer::very_permissive(), Some(Duration::from_secs(5)))
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Body, json: bool) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if json {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let res = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, HeaderMap, Value) {
    let (json, body) = match body {
        Some(v) => (true, Body::from(v.to_string())),
        None => (false, Body::empty()),
    };
    let (status, headers, bytes) = send_raw(app, method, uri, body, json).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
}

fn widget() -> Value {
    json!({"name": "Widget", "price": 5.00, "category": "Tools", "stockQuantity": 3})
}

fn ada(email: &str) -> Value {
    json!({"firstName": "Ada", "lastName": "Lovelace", "email": email, "country": "UK"})
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn operational_endpoints_respond() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, _, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/products"].is_object());

    send(&app, Method::GET, "/api/products", None).await;
    let (status, _, bytes) = send_raw(&app, Method::GET, "/metrics", Body::empty(), false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&bytes).contains("storefront_http_requests_total"));
}

#[tokio::test]
async fn seeded_products_are_listed_in_an_envelope() {
    let app = app();
    let (status, headers, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Products retrieved successfully");
    assert!(body["errors"].is_null());
    assert!(body["timestamp"].is_string());
    assert_eq!(ids(&body), [1, 2, 3, 4, 5]);

    let request_id = headers.get("x-request-id").and_then(|v| v.to_str().ok()).unwrap();
    assert_eq!(request_id.len(), 8);
    assert!(request_id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn created_product_gets_next_id_and_shows_in_low_stock() {
    let app = app();
    let (status, headers, body) = send(&app, Method::POST, "/api/products", Some(widget())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/api/products/6");
    assert_eq!(body["message"], "Product created successfully");
    assert_eq!(body["data"]["id"], 6);
    assert_eq!(body["data"]["isActive"], true);
    assert_eq!(body["data"]["price"], json!(5.0));

    let (status, _, body) = send(&app, Method::GET, "/api/products/low-stock?threshold=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Products with stock below 10 retrieved successfully");
    assert_eq!(ids(&body), [3, 6]);

    let (_, _, body) = send(&app, Method::GET, "/api/products/low-stock", None).await;
    assert_eq!(ids(&body), [3, 6]);
}

#[tokio::test]
async fn invalid_product_is_rejected_without_consuming_an_id() {
    let app = app();
    let mut bad = widget();
    bad["name"] = json!("");
    let (status, _, body) = send(&app, Method::POST, "/api/products", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid product data");
    let errors: Vec<&str> = body["errors"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert!(errors.contains(&"Product name is required"));

    let (_, _, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(ids(&body).len(), 5);
    let (_, _, body) = send(&app, Method::POST, "/api/products", Some(widget())).await;
    assert_eq!(body["data"]["id"], 6);
}

#[tokio::test]
async fn product_reads_by_id_category_and_search() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/api/products/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product retrieved successfully");
    assert_eq!(body["data"]["name"], "Wireless Mouse");

    let (status, _, body) = send(&app, Method::GET, "/api/products/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product with ID 42 not found");
    assert!(body["data"].is_null());

    let (_, _, body) = send(&app, Method::GET, "/api/products/category/electronics", None).await;
    assert_eq!(body["message"], "Products in category 'electronics' retrieved successfully");
    assert_eq!(ids(&body), [1, 2, 5]);

    let (_, _, all) = send(&app, Method::GET, "/api/products", None).await;
    let (_, _, empty) = send(&app, Method::GET, "/api/products/search?searchTerm=", None).await;
    let (_, _, missing) = send(&app, Method::GET, "/api/products/search", None).await;
    assert_eq!(ids(&empty), ids(&all));
    assert_eq!(ids(&missing), ids(&all));

    let (_, _, body) = send(&app, Method::GET, "/api/products/search?searchTerm=COFFEE", None).await;
    assert_eq!(body["message"], "Product search completed successfully");
    assert_eq!(ids(&body), [4]);
}

#[tokio::test]
async fn product_update_and_soft_delete() {
    let app = app();
    let mut change = widget();
    change["name"] = json!("Laptop Pro 2");
    let (status, _, body) = send(&app, Method::PUT, "/api/products/1", Some(change.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Laptop Pro 2");

    let (status, _, _) = send(&app, Method::PUT, "/api/products/99", Some(change)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(&app, Method::DELETE, "/api/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product deleted successfully");
    assert!(body.get("data").is_none());

    let (status, _, body) = send(&app, Method::DELETE, "/api/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _, _) = send(&app, Method::GET, "/api/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, _, body) = send(&app, Method::GET, "/api/products/search?searchTerm=laptop", None).await;
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn customer_email_rules() {
    let app = app();
    let (status, _, body) = send(&app, Method::POST, "/api/customers", Some(ada("JOHN.DOE@email.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email address is already in use");
    let (_, _, body) = send(&app, Method::GET, "/api/customers", None).await;
    assert_eq!(ids(&body).len(), 5);

    let (status, headers, body) = send(&app, Method::POST, "/api/customers", Some(ada("ada@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/api/customers/6");
    assert_eq!(body["data"]["fullName"], "Ada Lovelace");

    let mut same = ada("ada@example.com");
    same["city"] = json!("London");
    let (status, _, body) = send(&app, Method::PUT, "/api/customers/6", Some(same)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "London");

    let (status, _, body) = send(&app, Method::PUT, "/api/customers/6", Some(ada("jane.smith@email.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email address is already in use");
}

#[tokio::test]
async fn customer_validation_reports_every_field() {
    let app = app();
    let (status, _, body) = send(&app, Method::POST, "/api/customers", Some(json!({"email": "nope"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid customer data");
    assert_eq!(
        body["errors"],
        json!(["First name is required", "Last name is required", "Invalid email address format"])
    );
}

#[tokio::test]
async fn customer_lookups() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/api/customers/email/Sarah.Williams@email.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 4);

    let (status, _, body) = send(&app, Method::GET, "/api/customers/email/ghost@email.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer with email ghost@email.com not found");

    let (_, _, body) = send(&app, Method::GET, "/api/customers/country/usa", None).await;
    assert_eq!(body["message"], "Customers in country 'usa' retrieved successfully");
    assert_eq!(ids(&body).len(), 5);

    let (_, _, body) = send(&app, Method::GET, "/api/customers/search?searchTerm=brown", None).await;
    assert_eq!(ids(&body), [5]);
}

#[tokio::test]
async fn email_availability_endpoint() {
    let app = app();
    let (status, _, body) =
        send(&app, Method::GET, "/api/customers/validate-email?email=mike.johnson@email.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], false);
    assert_eq!(body["message"], "Email is already in use");

    let (_, _, body) = send(
        &app,
        Method::GET,
        "/api/customers/validate-email?email=mike.johnson@email.com&excludeCustomerId=3",
        None,
    )
    .await;
    assert_eq!(body["data"], true);
    assert_eq!(body["message"], "Email is available");

    let (status, _, body) = send(&app, Method::GET, "/api/customers/validate-email", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);
}

#[tokio::test]
async fn blank_exclusion_is_treated_as_absent() {
    let app = app();
    let (status, _, body) =
        send(&app, Method::GET, "/api/customers/validate-email?email=&excludeCustomerId=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (status, _, body) =
        send(&app, Method::GET, "/api/customers/validate-email?email=new@x.com&excludeCustomerId=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);
    assert_eq!(body["message"], "Email is available");

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/api/customers/validate-email?email=mike.johnson@email.com&excludeCustomerId=",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], false);

    let (status, _, body) =
        send(&app, Method::GET, "/api/customers/validate-email?email=new@x.com&excludeCustomerId=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid argument");
}

#[tokio::test]
async fn deleting_unknown_customer_is_404() {
    let app = app();
    let (status, _, body) = send(&app, Method::DELETE, "/api/customers/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Customer with ID 999 not found");
}

#[tokio::test]
async fn malformed_input_becomes_invalid_argument() {
    let app = app();
    let (status, _, bytes) =
        send_raw(&app, Method::POST, "/api/products", Body::from("{not json"), true).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid argument");
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));

    let (status, _, body) = send(&app, Method::GET, "/api/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid argument");

    let (status, _, body) = send(&app, Method::GET, "/api/products/low-stock?threshold=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid argument");

    let mut wrong_type = widget();
    wrong_type["price"] = json!("cheap");
    let (status, _, body) = send(&app, Method::POST, "/api/products", Some(wrong_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid argument");
}

#[tokio::test]
async fn unknown_api_route_gets_envelope() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Resource not found");

    let (status, _, _) = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unseeded_state_starts_empty() {
    let app = build_router(AppState::new(false), CorsLayer::very_permissive(), None);
    let (_, _, body) = send(&app, Method::GET, "/api/customers", None).await;
    assert!(ids(&body).is_empty());
    let (_, headers, _) = send(&app, Method::POST, "/api/products", Some(widget())).await;
    assert_eq!(headers[header::LOCATION], "/api/products/1");
}
