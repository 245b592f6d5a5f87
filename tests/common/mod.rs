#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fittrack::config::AuthConfig;
use fittrack::context::AppContext;
use fittrack::db::{create_memory_pool, DbPool};
use fittrack::migrations::run_migrations_for_tests;
use fittrack::models::{CreateUser, User};
use fittrack::repositories::UserRepository;
use fittrack::services::TokenIssuer;

pub const PASSWORD: &str = "password123";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 3600,
        rotate_refresh_tokens: false,
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_test_app_with_config(pool, &test_auth_config())
}

pub fn create_test_app_with_config(pool: DbPool, auth: &AuthConfig) -> Router {
    fittrack::routes::create_router(AppContext::new(pool, auth))
}

pub async fn create_test_user(pool: &DbPool, email: &str) -> User {
    UserRepository::new(pool.clone())
        .create(CreateUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            height_cm: 180,
            gender: None,
        })
        .await
        .unwrap()
}

/// A valid access token for `user_id`, signed like the app signs them.
pub fn access_token(user_id: &str) -> String {
    TokenIssuer::new(&test_auth_config())
        .issue_access(user_id)
        .unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON response (`Null` for an empty body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

pub async fn patch(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("PATCH", uri, Some(token), Some(body))).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("DELETE", uri, Some(token), None)).await
}

/// Log in over HTTP and return `(token, refreshToken)`.
pub async fn login(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["refreshToken"].as_str().unwrap().to_string(),
    )
}

pub async fn create_exercise(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = post(
        app,
        "/api/exercises",
        token,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create exercise failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}
