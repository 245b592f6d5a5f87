use chrono::Utc;
use serde::Serialize;

use super::tokens::{constant_time_eq, hash_token, TokenIssuer};
use crate::error::{AppError, Result};
use crate::models::RefreshToken;
use crate::repositories::{RefreshTokenRepository, UserRepository};

/// Token pair handed back by login and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    refresh_tokens: RefreshTokenRepository,
    tokens: TokenIssuer,
    rotate: bool,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        refresh_tokens: RefreshTokenRepository,
        tokens: TokenIssuer,
        rotate: bool,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
            rotate,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Verify credentials and issue a fresh token pair. Only the refresh
    /// token's digest is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let Some(user) = self.users.verify_password(email, password).await? else {
            tracing::warn!("Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        };

        let token = self.tokens.issue_access(&user.id)?;
        let (refresh_token, expires_at) = self.tokens.issue_refresh(&user.id)?;
        self.refresh_tokens
            .create(&user.id, &hash_token(&refresh_token), expires_at)
            .await?;

        tracing::info!("User {} logged in", user.id);
        Ok(AuthTokens {
            token,
            refresh_token,
        })
    }

    /// Revoke one refresh token. A second logout with the same token fails
    /// with `TokenNotFound`.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<()> {
        let (record, _) = self.find_record(refresh_token).await?;
        if !self.refresh_tokens.delete_by_id(&record.id).await? {
            return Err(AppError::TokenNotFound);
        }
        tracing::info!("User {} logged out", record.user_id);
        Ok(())
    }

    /// Mint a new access token. The presented refresh token is echoed back,
    /// or replaced by a new one when rotation is enabled.
    pub async fn refresh_token(&self, refresh_token: Option<&str>) -> Result<AuthTokens> {
        let (record, presented) = self.find_record(refresh_token).await?;
        let token = self.tokens.issue_access(&record.user_id)?;

        let refresh_token = if self.rotate {
            let (rotated, expires_at) = self.tokens.issue_refresh(&record.user_id)?;
            self.refresh_tokens
                .rotate(&record.id, &record.user_id, &hash_token(&rotated), expires_at)
                .await?;
            tracing::debug!("Rotated refresh token for user {}", record.user_id);
            rotated
        } else {
            presented.to_string()
        };

        Ok(AuthTokens {
            token,
            refresh_token,
        })
    }

    /// Revoke every refresh token of a user.
    pub async fn logout_all(&self, user_id: &str) -> Result<usize> {
        let removed = self.refresh_tokens.delete_all_for_user(user_id).await?;
        tracing::info!("Revoked {} refresh tokens for user {}", removed, user_id);
        Ok(removed)
    }

    /// Verify the presented token, then scan that user's live records for a
    /// matching digest. Returns the record along with the raw token.
    async fn find_record<'a>(
        &self,
        refresh_token: Option<&'a str>,
    ) -> Result<(RefreshToken, &'a str)> {
        let raw = match refresh_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AppError::MissingToken),
        };

        let claims = self.tokens.verify_refresh(raw).inspect_err(|e| {
            tracing::warn!("Rejected refresh token: {}", e);
        })?;

        let presented = hash_token(raw);
        let now = Utc::now();
        let candidates = self
            .refresh_tokens
            .list_active_by_user(&claims.user_id, now)
            .await?;
        tracing::debug!(
            "Scanning {} refresh tokens for user {}",
            candidates.len(),
            claims.user_id
        );

        candidates
            .into_iter()
            .find(|record| {
                !record.is_expired(now) && constant_time_eq(&record.token_hash, &presented)
            })
            .map(|record| (record, raw))
            .ok_or_else(|| {
                tracing::warn!("Refresh token for user {} not on record", claims.user_id);
                AppError::TokenNotFound
            })
    }
}
