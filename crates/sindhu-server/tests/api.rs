//! End-to-end tests for the REST API, driven through the router in-process.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sindhu_server::config::ServerConfig;
use sindhu_server::storage::{MemoryStore, SqliteStore};
use sindhu_server::{router, AppState};
use sindhu_core::CatalogStore;
use std::sync::Arc;
use tower::ServiceExt;

fn memory_app() -> Router {
    app_with(Arc::new(MemoryStore::new()), ServerConfig::default())
}

fn app_with(store: Arc<dyn CatalogStore>, config: ServerConfig) -> Router {
    router(AppState::new(store, config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), None).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body), None).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None, None).await
}

fn desk() -> Value {
    json!({
        "name": "Desk",
        "price": 10000,
        "category": "Furniture",
        "stockCount": 3
    })
}

fn error_fields(body: &Value) -> Vec<&str> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect()
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = memory_app();

    let (status, created) = post(&app, "/api/products", desk()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Desk");
    assert_eq!(created["featured"], false);
    assert_eq!(created["discountPrice"], Value::Null);
    assert_eq!(created["additionalImages"], json!([]));

    let (status, fetched) = get(&app, "/api/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = delete(&app, "/api/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, body) = get(&app, "/api/products/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) = delete(&app, "/api/products/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_numeric_strings_are_coerced() {
    let app = memory_app();

    let mut body = desk();
    body["price"] = json!("10000");
    body["stockCount"] = json!("5");
    let (status, created) = post(&app, "/api/products", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], 10000);
    assert_eq!(created["stockCount"], 5);
}

#[tokio::test]
async fn test_invalid_product_rejected() {
    let app = memory_app();

    let (status, body) = post(
        &app,
        "/api/products",
        json!({ "name": "", "price": 0, "category": "Furniture" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid product data");
    assert_eq!(error_fields(&body), vec!["name", "price"]);

    let mut discounted = desk();
    discounted["discountPrice"] = json!(10000);
    let (status, body) = post(&app, "/api/products", discounted).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["discountPrice"]);

    let (_, products) = get(&app, "/api/products").await;
    assert_eq!(products, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = memory_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Invalid product data");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_update() {
    let app = memory_app();
    let mut body = desk();
    body["description"] = json!("Solid oak");
    body["discountPrice"] = json!(9000);
    post(&app, "/api/products", body).await;

    let (status, updated) = put(&app, "/api/products/1", json!({ "price": 12000 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 12000);
    assert_eq!(updated["name"], "Desk");
    assert_eq!(updated["description"], "Solid oak");
    assert_eq!(updated["discountPrice"], 9000);

    // Lowering the price below the stored discount breaks the invariant
    let (status, body) = put(&app, "/api/products/1", json!({ "price": 8000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["discountPrice"]);

    let (status, cleared) = put(
        &app,
        "/api/products/1",
        json!({ "discountPrice": null, "description": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["discountPrice"], Value::Null);
    assert_eq!(cleared["description"], Value::Null);
    assert_eq!(cleared["price"], 12000);

    let (status, _) = put(&app, "/api/products/99", json!({ "name": "Chair" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = memory_app();

    let (status, body) = get(&app, "/api/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid product ID");

    let (status, _) = delete(&app, "/api/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/products/abc/reviews").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_and_featured_filters() {
    let app = memory_app();
    post(&app, "/api/products", desk()).await;
    post(
        &app,
        "/api/products",
        json!({
            "name": "Smart TV",
            "price": 45999,
            "category": "Electronics",
            "featured": true
        }),
    )
    .await;

    let (status, furniture) = get(&app, "/api/products/category/Furniture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(furniture.as_array().unwrap().len(), 1);
    assert_eq!(furniture[0]["name"], "Desk");

    let (_, none) = get(&app, "/api/products/category/Toys").await;
    assert_eq!(none, json!([]));

    let (status, featured) = get(&app, "/api/products/featured").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(featured.as_array().unwrap().len(), 1);
    assert_eq!(featured[0]["name"], "Smart TV");
}

#[tokio::test]
async fn test_reviews() {
    let app = memory_app();
    let review = json!({
        "name": "Neha",
        "rating": "5",
        "review": "Sturdy and beautifully finished"
    });

    let (status, body) = post(&app, "/api/products/7/reviews", review.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    post(&app, "/api/products", desk()).await;
    let (status, created) = post(&app, "/api/products/1/reviews", review).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["productId"], 1);
    assert_eq!(created["rating"], 5);
    assert!(created["createdAt"].is_string());

    let (status, body) = post(
        &app,
        "/api/products/1/reviews",
        json!({ "name": "N", "rating": 9, "review": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["name", "rating", "review"]);

    let (status, reviews) = get(&app, "/api/products/1/reviews").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, reviews) = get(&app, "/api/products/42/reviews").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews, json!([]));
}

#[tokio::test]
async fn test_contact_form() {
    let app = memory_app();

    let (status, body) = post(
        &app,
        "/api/contact",
        json!({
            "name": "A",
            "email": "not-an-email",
            "phone": "9800000000",
            "message": "short"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid contact form data");
    assert_eq!(error_fields(&body), vec!["email", "message", "name"]);

    let (_, inbox) = get(&app, "/api/contact/messages").await;
    assert_eq!(inbox, json!([]));

    let (status, body) = post(
        &app,
        "/api/contact",
        json!({
            "name": "Asha",
            "email": "asha@example.com",
            "phone": "9800000000",
            "message": "Do you deliver to Biratnagar?"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"]["createdAt"].is_string());

    let (_, inbox) = get(&app, "/api/contact/messages").await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_testimonial_management() {
    let app = memory_app();

    let (status, created) = post(
        &app,
        "/api/testimonials",
        json!({
            "name": "Ramesh",
            "location": "Kathmandu",
            "rating": 4,
            "review": "Great service"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, updated) = put(&app, "/api/testimonials/1", json!({ "rating": 5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rating"], 5);
    assert_eq!(updated["location"], "Kathmandu");

    let (status, _) = put(&app, "/api/testimonials/1", json!({ "rating": 6 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = delete(&app, "/api/testimonials/1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = delete(&app, "/api/testimonials/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, testimonials) = get(&app, "/api/testimonials").await;
    assert_eq!(testimonials, json!([]));
}

#[tokio::test]
async fn test_admin_auth_gates_mutations() {
    let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
    let config = ServerConfig {
        require_admin_auth: true,
        jwt_secret: "test-secret".to_string(),
        ..ServerConfig::default()
    };
    let state = AppState::new(store, config);
    state
        .auth_service
        .ensure_user("admin", "sindhu-admin")
        .await
        .unwrap();
    let app = router(state);

    let (status, body) = post(&app, "/api/products", desk()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = get(&app, "/api/contact/messages").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Reads stay public
    let (status, _) = get(&app, "/api/products").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app,
        "/api/auth/login",
        json!({ "username": "admin", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, login) = post(
        &app,
        "/api/auth/login",
        json!({ "username": "admin", "password": "sindhu-admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["username"], "admin");
    let token = login["accessToken"].as_str().unwrap().to_string();

    let (status, me) = send(&app, Method::GET, "/api/auth/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(desk()),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/products/1",
        None,
        Some("not-a-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_incomplete_body() {
    let app = memory_app();

    let (status, body) = post(&app, "/api/auth/login", json!({ "username": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid login data");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({ "username": "admin", "password": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["password"]);
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (status, body) = get(&memory_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");

    let sqlite = app_with(
        Arc::new(SqliteStore::in_memory().await.unwrap()),
        ServerConfig::default(),
    );
    let (_, body) = get(&sqlite, "/health").await;
    assert_eq!(body["storage"], "sqlite");
}

#[tokio::test]
async fn test_sqlite_backend_behaves_the_same() {
    let app = app_with(
        Arc::new(SqliteStore::in_memory().await.unwrap()),
        ServerConfig::default(),
    );

    let (status, created) = post(&app, "/api/products", desk()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, updated) = put(
        &app,
        "/api/products/1",
        json!({ "discountPrice": 9500, "additionalImages": ["/a.jpg"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["discountPrice"], 9500);
    assert_eq!(updated["additionalImages"], json!(["/a.jpg"]));

    let (status, body) = put(&app, "/api/products/1", json!({ "price": 9000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["discountPrice"]);

    post(
        &app,
        "/api/products/1/reviews",
        json!({ "name": "Neha", "rating": 4, "review": "Good value for money" }),
    )
    .await;
    let (status, _) = delete(&app, "/api/products/1").await;
    assert_eq!(status, StatusCode::OK);

    let (_, reviews) = get(&app, "/api/products/1/reviews").await;
    assert_eq!(reviews, json!([]));
}
