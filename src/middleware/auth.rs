use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, Extension};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::{AppError, Result};
use crate::services::TokenIssuer;

/// The caller identified by a valid bearer access token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Extension(tokens) = Extension::<Arc<TokenIssuer>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::MissingToken
                    } else {
                        AppError::InvalidToken
                    }
                })?;

        let claims = tokens.verify_access(bearer.token())?;
        Ok(AuthUser { id: claims.user_id })
    }
}

/// Pass only when the authenticated caller owns the addressed resource.
pub fn authorize(authenticated_id: &str, resource_owner_id: &str) -> Result<()> {
    if authenticated_id != resource_owner_id {
        tracing::warn!(
            "User {} denied access to resources of {}",
            authenticated_id,
            resource_owner_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}
