use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::{authorize, AuthUser, ValidatedJson};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: UserRepository,
}

fn email_taken() -> AppError {
    AppError::Conflict("Email is already registered".to_string())
}

pub async fn register(
    State(state): State<UsersState>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    if state.user_repo.find_by_email(&input.email).await?.is_some() {
        return Err(email_taken());
    }
    let user = state.user_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    State(state): State<UsersState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<User>> {
    authorize(&auth_user.id, &user_id)?;

    let user = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<UsersState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<User>> {
    authorize(&auth_user.id, &user_id)?;

    if let Some(email) = &input.email {
        if let Some(existing) = state.user_repo.find_by_email(email).await? {
            if existing.id != user_id {
                return Err(email_taken());
            }
        }
    }

    let user = state
        .user_repo
        .update(&user_id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<UsersState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    authorize(&auth_user.id, &user_id)?;

    if !state.user_repo.delete(&user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!("Deleted user {}", user_id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
