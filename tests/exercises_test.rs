mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn create_muscle_group(app: &axum::Router, token: &str, name: &str) -> String {
    let (status, body) = common::post(app, "/api/muscle-groups", token, json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn muscle_group_names(body: &serde_json::Value) -> Vec<String> {
    body["muscleGroups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_and_get_exercise() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);
    let chest = create_muscle_group(&app, &token, "Chest").await;

    let (status, body) = common::post(
        &app,
        "/api/exercises",
        &token,
        json!({
            "name": "  Bench Press ",
            "description": "Flat barbell press",
            "equipment": "Barbell",
            "muscleGroupIds": [chest]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Bench Press");
    assert_eq!(body["userId"], user.id.as_str());
    assert_eq!(muscle_group_names(&body), vec!["Chest"]);

    let id = body["id"].as_str().unwrap();
    let (status, body) = common::get(&app, &format!("/api/exercises/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment"], "Barbell");

    let (status, body) = common::get(&app, "/api/exercises", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_exercise_requires_name() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);

    let (status, _) = common::post(&app, "/api/exercises", &token, json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::post(&app, "/api/exercises", &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_exercise_is_not_found() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice@x.com").await;
    let bob = common::create_test_user(&pool, "bob@x.com").await;
    let app = common::create_test_app(pool);
    let alice_token = common::access_token(&alice.id);
    let bob_token = common::access_token(&bob.id);

    let id = common::create_exercise(&app, &alice_token, "Deadlift").await;
    let uri = format!("/api/exercises/{}", id);

    let (get_status, body) = common::get(&app, &uri, &bob_token).await;
    let (patch_status, _) = common::patch(&app, &uri, &bob_token, json!({ "name": "Mine" })).await;
    let (delete_status, _) = common::delete(&app, &uri, &bob_token).await;

    assert_eq!(get_status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Exercise not found");
    assert_eq!(patch_status, StatusCode::NOT_FOUND);
    assert_eq!(delete_status, StatusCode::NOT_FOUND);

    let (status, body) = common::get(&app, &uri, &alice_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Deadlift");

    let (_, list) = common::get(&app, "/api/exercises", &bob_token).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_patch_exercise_field_states() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);

    let (_, created) = common::post(
        &app,
        "/api/exercises",
        &token,
        json!({ "name": "Row", "description": "Bent over", "equipment": "Barbell" }),
    )
    .await;
    let uri = format!("/api/exercises/{}", created["id"].as_str().unwrap());

    let (status, body) = common::patch(&app, &uri, &token, json!({ "description": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["description"].is_null());
    assert_eq!(body["equipment"], "Barbell");
    assert_eq!(body["name"], "Row");

    let (_, body) = common::patch(&app, &uri, &token, json!({ "name": "Pendlay Row" })).await;
    assert_eq!(body["name"], "Pendlay Row");
    assert_eq!(body["equipment"], "Barbell");
}

#[tokio::test]
async fn test_muscle_group_ids_three_states() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);
    let back = create_muscle_group(&app, &token, "Back").await;
    let biceps = create_muscle_group(&app, &token, "Biceps").await;
    let legs = create_muscle_group(&app, &token, "Legs").await;

    let (_, created) = common::post(
        &app,
        "/api/exercises",
        &token,
        json!({ "name": "Pull-up", "muscleGroupIds": [back, biceps] }),
    )
    .await;
    let uri = format!("/api/exercises/{}", created["id"].as_str().unwrap());

    let (_, body) = common::patch(&app, &uri, &token, json!({ "name": "Chin-up" })).await;
    assert_eq!(muscle_group_names(&body), vec!["Back", "Biceps"]);

    let (_, body) = common::patch(&app, &uri, &token, json!({ "muscleGroupIds": [legs] })).await;
    assert_eq!(muscle_group_names(&body), vec!["Legs"]);

    let (_, body) = common::patch(&app, &uri, &token, json!({ "muscleGroupIds": [] })).await;
    assert!(muscle_group_names(&body).is_empty());
}

#[tokio::test]
async fn test_foreign_muscle_group_rolls_back_update() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice@x.com").await;
    let bob = common::create_test_user(&pool, "bob@x.com").await;
    let app = common::create_test_app(pool);
    let alice_token = common::access_token(&alice.id);
    let bob_token = common::access_token(&bob.id);

    let mine = create_muscle_group(&app, &alice_token, "Chest").await;
    let theirs = create_muscle_group(&app, &bob_token, "Chest").await;
    let (_, created) = common::post(
        &app,
        "/api/exercises",
        &alice_token,
        json!({ "name": "Dip", "muscleGroupIds": [mine] }),
    )
    .await;
    let uri = format!("/api/exercises/{}", created["id"].as_str().unwrap());

    let (status, _) = common::patch(
        &app,
        &uri,
        &alice_token,
        json!({ "name": "Ring Dip", "muscleGroupIds": [theirs] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = common::get(&app, &uri, &alice_token).await;
    assert_eq!(body["name"], "Dip");
    assert_eq!(muscle_group_names(&body), vec!["Chest"]);
}

#[tokio::test]
async fn test_link_and_unlink_muscle_group() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);
    let shoulders = create_muscle_group(&app, &token, "Shoulders").await;
    let id = common::create_exercise(&app, &token, "Overhead Press").await;
    let link = format!("/api/exercises/{}/muscle-groups/{}", id, shoulders);

    let (status, _) = common::send(&app, common::request("POST", &link, Some(&token), None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::get(&app, &format!("/api/exercises/{}/muscle-groups", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Shoulders");

    let (status, _) = common::delete(&app, &link, &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::delete(&app, &link, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Relationship not found");
}

#[tokio::test]
async fn test_delete_exercise() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "a@x.com").await;
    let app = common::create_test_app(pool);
    let token = common::access_token(&user.id);
    let id = common::create_exercise(&app, &token, "Lunge").await;
    let uri = format!("/api/exercises/{}", id);

    let (status, _) = common::delete(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::get(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
