use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{BodyWeight, CreateBodyWeight, UpdateBodyWeight};
use crate::repositories::BodyWeightRepository;

#[derive(Clone)]
pub struct BodyWeightsState {
    pub body_weight_repo: BodyWeightRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Body weight entry not found".to_string())
}

pub async fn list(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<BodyWeight>>> {
    let entries = state
        .body_weight_repo
        .find_all_by_user(&auth_user.id)
        .await?;
    Ok(Json(entries))
}

pub async fn latest(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
) -> Result<Json<BodyWeight>> {
    let entry = state
        .body_weight_repo
        .find_latest(&auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(entry))
}

pub async fn show(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BodyWeight>> {
    let entry = state
        .body_weight_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(entry))
}

pub async fn create(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateBodyWeight>,
) -> Result<(StatusCode, Json<BodyWeight>)> {
    let entry = state.body_weight_repo.create(&auth_user.id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateBodyWeight>,
) -> Result<Json<BodyWeight>> {
    let entry = state
        .body_weight_repo
        .update(&id, &auth_user.id, input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(entry))
}

pub async fn delete(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.body_weight_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Body weight entry successfully deleted")))
}
