mod common;

use axum::http::StatusCode;
use fittrack::repositories::{RefreshTokenRepository, UserRepository};
use serde_json::json;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": email,
        "password": "password123",
        "birthDate": "1985-12-09",
        "heightCm": 165,
        "gender": "female"
    })
}

async fn register(app: &axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    common::send(app, common::request("POST", "/api/users", None, Some(body))).await
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = register(&app, registration("Grace@Example.COM")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["gender"], "female");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_trims_padded_email() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = register(&app, registration("  Pad@X.com ")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "pad@x.com");

    let (status, _) = register(&app, registration("pad@x.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_patch_trims_padded_email() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);

    let (status, body) = common::patch(
        &app,
        &format!("/api/users/{}", user.id),
        &token,
        json!({ "email": " New@X.COM  " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@x.com");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    register(&app, registration("grace@example.com")).await;
    let (status, _) = register(&app, registration("GRACE@example.com")).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let mut short_password = registration("a@x.com");
    short_password["password"] = json!("short");
    let mut future_birth = registration("b@x.com");
    future_birth["birthDate"] = json!("2999-01-01");
    let mut bad_gender = registration("c@x.com");
    bad_gender["gender"] = json!("robot");
    let mut bad_height = registration("d@x.com");
    bad_height["heightCm"] = json!(0);

    for body in [short_password, future_birth, bad_gender, bad_height] {
        let (status, response) = register(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", response);
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn test_get_own_profile() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);

    let (status, body) = common::get(&app, &format!("/api/users/{}", user.id), &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["heightCm"], 180);
}

#[tokio::test]
async fn test_other_users_profile_is_forbidden() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice@x.com").await;
    let bob = common::create_test_user(&pool, "bob@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&alice.id);
    let uri = format!("/api/users/{}", bob.id);

    let (get_status, body) = common::get(&app, &uri, &token).await;
    let (patch_status, _) = common::patch(&app, &uri, &token, json!({ "firstName": "X" })).await;
    let (delete_status, _) = common::delete(&app, &uri, &token).await;

    assert_eq!(get_status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Forbidden: You do not have access to this resource"
    );
    assert_eq!(patch_status, StatusCode::FORBIDDEN);
    assert_eq!(delete_status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patch_rehashes_password() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool.clone());
    let token = common::access_token(&user.id);

    let (status, body) = common::patch(
        &app,
        &format!("/api/users/{}", user.id),
        &token,
        json!({ "password": "a-new-password", "lastName": "Renamed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "Renamed");
    assert_eq!(body["firstName"], "Test");

    let repo = UserRepository::new(pool);
    let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, user.password_hash);
    assert!(!stored.password_hash.contains("a-new-password"));
    assert!(repo
        .verify_password("a@x.com", "a-new-password")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .verify_password("a@x.com", common::PASSWORD)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_patch_to_taken_email_conflicts() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice@x.com").await;
    common::create_test_user(&pool, "bob@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&alice.id);

    let (status, _) = common::patch(
        &app,
        &format!("/api/users/{}", alice.id),
        &token,
        json!({ "email": "bob@x.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_account_cascades() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool.clone());
    let (token, _) = common::login(&app, "a@x.com").await;
    common::create_exercise(&app, &token, "Squat").await;

    let (status, _) = common::delete(&app, &format!("/api/users/{}", user.id), &token).await;
    assert_eq!(status, StatusCode::OK);

    let conn = pool.get().unwrap();
    let exercises: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM exercises WHERE user_id = ?",
            [&user.id],
            |row| row.get(0),
        )
        .unwrap();
    drop(conn);
    assert_eq!(exercises, 0);

    let tokens = RefreshTokenRepository::new(pool)
        .list_by_user(&user.id)
        .await
        .unwrap();
    assert!(tokens.is_empty());
}
