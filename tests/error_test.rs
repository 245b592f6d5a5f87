mod common;

use axum::{http::StatusCode, response::IntoResponse};
use fittrack::error::AppError;
use http_body_util::BodyExt;
use serde_json::Value;

async fn body_of(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_token_errors_return_401() {
    for (error, message) in [
        (AppError::InvalidCredentials, "Invalid credentials"),
        (AppError::MissingToken, "No token provided"),
        (AppError::InvalidToken, "Invalid token"),
        (AppError::TokenExpired, "Token expired"),
        (AppError::TokenNotFound, "Token not found"),
    ] {
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_not_found_returns_404() {
    let (status, body) = body_of(AppError::NotFound("Exercise not found".to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Exercise not found");
}

#[tokio::test]
async fn test_forbidden_returns_403() {
    let (status, body) = body_of(AppError::Forbidden).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Forbidden: You do not have access to this resource"
    );
}

#[tokio::test]
async fn test_conflict_validation_integrity() {
    let (status, _) = body_of(AppError::Conflict("taken".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = body_of(AppError::Validation("Invalid field".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid field");

    let (status, _) = body_of(AppError::Integrity("Exercise x does not exist".to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = body_of(AppError::Internal("disk on fire".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal error");

    let (status, _) = body_of(AppError::PasswordHash).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);

    let request = http::Request::builder()
        .method("POST")
        .uri("/api/muscle-groups")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = common::send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_check() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = common::send(&app, common::request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
