use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::MessageResponse;
use crate::error::Result;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::LoginCredentials;
use crate::services::{AuthService, AuthTokens};

#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
}

/// Body of logout and refresh. An absent or empty token is `MissingToken`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    pub message: String,
    pub revoked: usize,
}

pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(credentials): ValidatedJson<LoginCredentials>,
) -> Result<Json<AuthTokens>> {
    let tokens = state
        .auth_service
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(tokens))
}

pub async fn logout(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .auth_service
        .logout(request.refresh_token.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

pub async fn refresh_token(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<AuthTokens>> {
    let tokens = state
        .auth_service
        .refresh_token(request.refresh_token.as_deref())
        .await?;
    Ok(Json(tokens))
}

pub async fn logout_all(
    State(state): State<AuthState>,
    auth_user: AuthUser,
) -> Result<Json<LogoutAllResponse>> {
    let revoked = state.auth_service.logout_all(&auth_user.id).await?;
    Ok(Json(LogoutAllResponse {
        message: "Logged out of all sessions".to_string(),
        revoked,
    }))
}
