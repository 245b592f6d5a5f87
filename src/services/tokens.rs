//! Signed access/refresh tokens and the refresh-token digest.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique per token so two tokens minted in the same second still differ.
    pub jti: String,
}

/// Issues and verifies both token kinds. Access and refresh tokens are signed
/// with different secrets, so one can never stand in for the other.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_ttl_secs),
        }
    }

    pub fn issue_access(&self, user_id: &str) -> Result<String> {
        let (token, _) = sign(&self.access_encoding, user_id, self.access_ttl)?;
        Ok(token)
    }

    /// Returns the token and the expiry to store alongside its digest.
    pub fn issue_refresh(&self, user_id: &str) -> Result<(String, DateTime<Utc>)> {
        sign(&self.refresh_encoding, user_id, self.refresh_ttl)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        verify(&self.access_decoding, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        verify(&self.refresh_decoding, token)
    }
}

fn sign(key: &EncodingKey, user_id: &str, ttl: Duration) -> Result<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = now + ttl;
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, key)?;
    Ok((token, expires_at))
}

fn verify(key: &DecodingKey, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
}

/// SHA-256 hex digest of a raw token. Only this form is ever persisted.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Compare two digests without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
            rotate_refresh_tokens: false,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let issuer = TokenIssuer::new(&config());
        let token = issuer.issue_access("user-1").unwrap();
        let claims = issuer.verify_access(&token).unwrap();

        assert_eq!(claims.user_id, "user-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_expiry_matches_claims() {
        let issuer = TokenIssuer::new(&config());
        let (token, expires_at) = issuer.issue_refresh("user-1").unwrap();
        let claims = issuer.verify_refresh(&token).unwrap();

        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let issuer = TokenIssuer::new(&config());
        let access = issuer.issue_access("user-1").unwrap();
        let (refresh, _) = issuer.issue_refresh("user-1").unwrap();

        assert!(matches!(
            issuer.verify_refresh(&access),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            issuer.verify_access(&refresh),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let mut expired = config();
        expired.access_ttl_secs = -60;
        let issuer = TokenIssuer::new(&expired);
        let token = issuer.issue_access("user-1").unwrap();

        assert!(matches!(
            issuer.verify_access(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let issuer = TokenIssuer::new(&config());
        assert!(matches!(
            issuer.verify_access("not.a.jwt"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let issuer = TokenIssuer::new(&config());
        let (first, _) = issuer.issue_refresh("user-1").unwrap();
        let (second, _) = issuer.issue_refresh("user-1").unwrap();
        assert_ne!(hash_token(&first), hash_token(&second));
    }

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let digest = hash_token("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(!digest.contains("abc"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abcd", "abcd"));
        assert!(!constant_time_eq("abcd", "abce"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
