use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{CreateMuscleGroup, MuscleGroup, UpdateMuscleGroup};
use crate::repositories::MuscleGroupRepository;

#[derive(Clone)]
pub struct MuscleGroupsState {
    pub muscle_group_repo: MuscleGroupRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Muscle group not found".to_string())
}

fn duplicate_name(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => {
            AppError::Conflict("A muscle group with that name already exists".to_string())
        }
        other => other,
    }
}

pub async fn list(
    State(state): State<MuscleGroupsState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<MuscleGroup>>> {
    let groups = state
        .muscle_group_repo
        .find_all_by_user(&auth_user.id)
        .await?;
    Ok(Json(groups))
}

pub async fn show(
    State(state): State<MuscleGroupsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MuscleGroup>> {
    let group = state
        .muscle_group_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(group))
}

pub async fn create(
    State(state): State<MuscleGroupsState>,
    auth_user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateMuscleGroup>,
) -> Result<(StatusCode, Json<MuscleGroup>)> {
    let group = state
        .muscle_group_repo
        .create(&auth_user.id, &input.name)
        .await
        .map_err(duplicate_name)?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn update(
    State(state): State<MuscleGroupsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateMuscleGroup>,
) -> Result<Json<MuscleGroup>> {
    let group = state
        .muscle_group_repo
        .update(&id, &auth_user.id, input.name.as_deref())
        .await
        .map_err(duplicate_name)?
        .ok_or_else(not_found)?;
    Ok(Json(group))
}

pub async fn delete(
    State(state): State<MuscleGroupsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.muscle_group_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Muscle Group successfully deleted")))
}
