use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{CreateWorkoutSession, UpdateWorkoutSession, WorkoutSessionDetail};
use crate::repositories::WorkoutSessionRepository;

#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: WorkoutSessionRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout session not found".to_string())
}

pub async fn list(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WorkoutSessionDetail>>> {
    let sessions = state.session_repo.find_all_by_user(&auth_user.id).await?;
    Ok(Json(sessions))
}

pub async fn show(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutSessionDetail>> {
    let session = state
        .session_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(session))
}

pub async fn create(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateWorkoutSession>,
) -> Result<(StatusCode, Json<WorkoutSessionDetail>)> {
    let session = state.session_repo.create(&auth_user.id, input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateWorkoutSession>,
) -> Result<Json<WorkoutSessionDetail>> {
    let session = state
        .session_repo
        .update(&id, &auth_user.id, input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(session))
}

pub async fn delete(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.session_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new(
        "Workout Session successfully deleted",
    )))
}
