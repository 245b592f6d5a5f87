use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, RefreshToken};

/// Persists refresh-token digests. Rows are never updated in place.
#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: DbPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Store a token digest for a user. The user's already-expired rows are
    /// pruned in the same transaction.
    pub async fn create(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken> {
        let pool = self.pool.clone();
        let record = RefreshToken {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        let record_clone = record.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let pruned = tx.execute(
                "DELETE FROM refresh_tokens WHERE user_id = ? AND expires_at <= ?",
                rusqlite::params![record_clone.user_id, record_clone.created_at],
            )?;
            if pruned > 0 {
                tracing::debug!("Pruned {} expired refresh tokens", pruned);
            }
            insert(&tx, &record_clone)?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(record)
    }

    /// Every stored record for a user, expired or not.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<RefreshToken>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
            )?;
            let tokens = stmt
                .query_map([&user_id], RefreshToken::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tokens)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Records for a user whose stored expiry is still in the future.
    pub async fn list_active_by_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM refresh_tokens WHERE user_id = ? AND expires_at > ?
                 ORDER BY created_at DESC",
            )?;
            let tokens = stmt
                .query_map(rusqlite::params![user_id, now], RefreshToken::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tokens)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM refresh_tokens WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Revoke every session of a user. Returns the number of rows removed.
    pub async fn delete_all_for_user(&self, user_id: &str) -> Result<usize> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM refresh_tokens WHERE user_id = ?", [&user_id])?;
            Ok(rows)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Replace one record with a freshly issued one in a single transaction.
    /// Fails with `TokenNotFound` if the old record was already removed, so a
    /// token can only be rotated once.
    pub async fn rotate(
        &self,
        old_id: &str,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken> {
        let pool = self.pool.clone();
        let old_id = old_id.to_string();
        let record = RefreshToken {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        let record_clone = record.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM refresh_tokens WHERE id = ? AND user_id = ?",
                rusqlite::params![old_id, record_clone.user_id],
            )?;
            if removed == 0 {
                return Err(AppError::TokenNotFound);
            }
            insert(&tx, &record_clone)?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(record)
    }
}

fn insert(conn: &rusqlite::Connection, record: &RefreshToken) -> Result<()> {
    conn.execute(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![
            record.id,
            record.user_id,
            record.token_hash,
            record.expires_at,
            record.created_at
        ],
    )?;
    Ok(())
}
