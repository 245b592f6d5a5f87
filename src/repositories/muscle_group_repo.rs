use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, MuscleGroup};
use crate::validation::trimmed;

#[derive(Clone)]
pub struct MuscleGroupRepository {
    pool: DbPool,
}

impl MuscleGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<MuscleGroup>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM muscle_groups WHERE id = ? AND user_id = ?")?;
            let result = stmt
                .query_row([&id, &user_id], MuscleGroup::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<MuscleGroup>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM muscle_groups WHERE user_id = ? ORDER BY created_at DESC, name",
            )?;
            let groups = stmt
                .query_map([&user_id], MuscleGroup::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(groups)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Names are unique per owner; a duplicate surfaces as `Conflict`.
    pub async fn create(&self, user_id: &str, name: &str) -> Result<MuscleGroup> {
        let pool = self.pool.clone();
        let group = MuscleGroup {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: trimmed(name),
            created_at: Utc::now(),
        };
        let group_clone = group.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO muscle_groups (id, user_id, name, created_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    group_clone.id,
                    group_clone.user_id,
                    group_clone.name,
                    group_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(group)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<Option<MuscleGroup>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.map(trimmed);

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if let Some(name) = &name {
                conn.execute(
                    "UPDATE muscle_groups SET name = ? WHERE id = ? AND user_id = ?",
                    [name, &id, &user_id],
                )?;
            }
            let group = conn
                .query_row(
                    "SELECT * FROM muscle_groups WHERE id = ? AND user_id = ?",
                    [&id, &user_id],
                    MuscleGroup::from_row,
                )
                .optional()?;
            Ok(group)
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
                "DELETE FROM muscle_groups WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
