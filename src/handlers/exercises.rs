use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{CreateExercise, Exercise, ExerciseDetail, MuscleGroup, UpdateExercise};
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Exercise not found".to_string())
}

pub async fn list(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state.exercise_repo.find_all_by_user(&auth_user.id).await?;
    Ok(Json(exercises))
}

pub async fn show(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExerciseDetail>> {
    let exercise = state
        .exercise_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(exercise))
}

pub async fn create(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateExercise>,
) -> Result<(StatusCode, Json<ExerciseDetail>)> {
    let exercise = state.exercise_repo.create(&auth_user.id, input).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateExercise>,
) -> Result<Json<ExerciseDetail>> {
    let exercise = state
        .exercise_repo
        .update(&id, &auth_user.id, input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(exercise))
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.exercise_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Exercise successfully deleted")))
}

pub async fn list_muscle_groups(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<MuscleGroup>>> {
    let groups = state
        .exercise_repo
        .find_muscle_groups(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(groups))
}

pub async fn add_muscle_group(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path((id, muscle_group_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state
        .exercise_repo
        .add_muscle_group(&id, &muscle_group_id, &auth_user.id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Muscle Group successfully added")),
    ))
}

pub async fn remove_muscle_group(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path((id, muscle_group_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    state
        .exercise_repo
        .remove_muscle_group(&id, &muscle_group_id, &auth_user.id)
        .await?;
    Ok(Json(MessageResponse::new(
        "Muscle Group successfully removed from exercise",
    )))
}
