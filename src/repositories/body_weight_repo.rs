use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{BodyWeight, CreateBodyWeight, FromSqliteRow, UpdateBodyWeight};

#[derive(Clone)]
pub struct BodyWeightRepository {
    pool: DbPool,
}

impl BodyWeightRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<BodyWeight>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let entry = conn
                .query_row(
                    "SELECT * FROM body_weights WHERE id = ? AND user_id = ?",
                    [&id, &user_id],
                    BodyWeight::from_row,
                )
                .optional()?;
            Ok(entry)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Newest entry first.
    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<BodyWeight>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM body_weights WHERE user_id = ? ORDER BY recorded_at DESC",
            )?;
            let entries = stmt
                .query_map([&user_id], BodyWeight::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_latest(&self, user_id: &str) -> Result<Option<BodyWeight>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let entry = conn
                .query_row(
                    "SELECT * FROM body_weights WHERE user_id = ?
                     ORDER BY recorded_at DESC, rowid DESC LIMIT 1",
                    [&user_id],
                    BodyWeight::from_row,
                )
                .optional()?;
            Ok(entry)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// `recordedAt` defaults to now.
    pub async fn create(&self, user_id: &str, input: CreateBodyWeight) -> Result<BodyWeight> {
        let pool = self.pool.clone();
        let entry = BodyWeight {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            weight_kg: input.weight_kg,
            recorded_at: input.recorded_at.unwrap_or_else(Utc::now),
        };
        let entry_clone = entry.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO body_weights (id, user_id, weight_kg, recorded_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    entry_clone.id,
                    entry_clone.user_id,
                    entry_clone.weight_kg,
                    entry_clone.recorded_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(entry)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateBodyWeight,
    ) -> Result<Option<BodyWeight>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "UPDATE body_weights
                 SET weight_kg = COALESCE(?, weight_kg), recorded_at = COALESCE(?, recorded_at)
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![input.weight_kg, input.recorded_at, id, user_id],
            )?;
            let entry = conn
                .query_row(
                    "SELECT * FROM body_weights WHERE id = ? AND user_id = ?",
                    [&id, &user_id],
                    BodyWeight::from_row,
                )
                .optional()?;
            Ok(entry)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM body_weights WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
