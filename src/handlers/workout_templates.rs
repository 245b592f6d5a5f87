use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{CreateWorkoutTemplate, UpdateWorkoutTemplate, WorkoutTemplateDetail};
use crate::repositories::TemplateRepository;

#[derive(Clone)]
pub struct TemplatesState {
    pub template_repo: TemplateRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout template not found".to_string())
}

fn duplicate_name(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => {
            AppError::Conflict("A workout template with that name already exists".to_string())
        }
        other => other,
    }
}

pub async fn list(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WorkoutTemplateDetail>>> {
    let templates = state.template_repo.find_all_by_user(&auth_user.id).await?;
    Ok(Json(templates))
}

pub async fn show(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutTemplateDetail>> {
    let template = state
        .template_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(template))
}

pub async fn create(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateWorkoutTemplate>,
) -> Result<(StatusCode, Json<WorkoutTemplateDetail>)> {
    let template = state
        .template_repo
        .create(&auth_user.id, input)
        .await
        .map_err(duplicate_name)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateWorkoutTemplate>,
) -> Result<Json<WorkoutTemplateDetail>> {
    let template = state
        .template_repo
        .update(&id, &auth_user.id, input)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(not_found)?;
    Ok(Json(template))
}

pub async fn delete(
    State(state): State<TemplatesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.template_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new(
        "Workout Template successfully deleted",
    )))
}
