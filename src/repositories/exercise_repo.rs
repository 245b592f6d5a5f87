use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::sync::{self, EXERCISE_MUSCLE_GROUPS};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CreateExercise, Exercise, ExerciseDetail, FromSqliteRow, MuscleGroup, UpdateExercise,
};
use crate::validation::{trimmed, trimmed_opt};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<ExerciseDetail>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            load_detail(&conn, &id, &user_id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises WHERE user_id = ? ORDER BY created_at DESC, name",
            )?;
            let exercises = stmt
                .query_map([&user_id], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Create an exercise and, if given, link it to the caller's muscle groups.
    pub async fn create(&self, user_id: &str, input: CreateExercise) -> Result<ExerciseDetail> {
        let pool = self.pool.clone();
        let exercise = Exercise {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: trimmed(&input.name),
            description: trimmed_opt(input.description.as_deref()),
            equipment: trimmed_opt(input.equipment.as_deref()),
            created_at: Utc::now(),
        };

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO exercises (id, user_id, name, description, equipment, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    exercise.id,
                    exercise.user_id,
                    exercise.name,
                    exercise.description,
                    exercise.equipment,
                    exercise.created_at
                ],
            )?;
            sync::replace_children(
                &tx,
                EXERCISE_MUSCLE_GROUPS,
                &exercise.id,
                input.muscle_group_ids.as_deref(),
                |tx, muscle_group_id| link(tx, &exercise.id, muscle_group_id, &exercise.user_id),
            )?;
            let detail = load_detail(&tx, &exercise.id, &exercise.user_id)?
                .ok_or_else(|| AppError::Internal("created exercise vanished".to_string()))?;
            tx.commit()?;
            Ok(detail)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateExercise,
    ) -> Result<Option<ExerciseDetail>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let Some(mut exercise) = find_owned(&tx, &id, &user_id)? else {
                return Ok(None);
            };

            if let Some(name) = input.name {
                exercise.name = trimmed(&name);
            }
            if let Some(description) = input.description {
                exercise.description = trimmed_opt(description.as_deref());
            }
            if let Some(equipment) = input.equipment {
                exercise.equipment = trimmed_opt(equipment.as_deref());
            }

            tx.execute(
                "UPDATE exercises SET name = ?, description = ?, equipment = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    exercise.name,
                    exercise.description,
                    exercise.equipment,
                    id,
                    user_id
                ],
            )?;
            sync::replace_children(
                &tx,
                EXERCISE_MUSCLE_GROUPS,
                &id,
                input.muscle_group_ids.as_deref(),
                |tx, muscle_group_id| link(tx, &id, muscle_group_id, &user_id),
            )?;

            let detail = load_detail(&tx, &id, &user_id)?;
            tx.commit()?;
            Ok(detail)
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
                "DELETE FROM exercises WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Muscle groups linked to an exercise, or `None` if the exercise is not
    /// the caller's.
    pub async fn find_muscle_groups(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Vec<MuscleGroup>>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            if find_owned(&conn, &id, &user_id)?.is_none() {
                return Ok(None);
            }
            Ok(Some(muscle_groups_for(&conn, &id)?))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Link a muscle group. Linking twice is a no-op.
    pub async fn add_muscle_group(
        &self,
        id: &str,
        muscle_group_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let muscle_group_id = muscle_group_id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            ensure_pair_visible(&conn, &id, &muscle_group_id, &user_id)?;
            conn.execute(
                "INSERT OR IGNORE INTO exercise_muscle_groups (exercise_id, muscle_group_id)
                 VALUES (?, ?)",
                [&id, &muscle_group_id],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn remove_muscle_group(
        &self,
        id: &str,
        muscle_group_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let muscle_group_id = muscle_group_id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            ensure_pair_visible(&conn, &id, &muscle_group_id, &user_id)?;
            let rows = conn.execute(
                "DELETE FROM exercise_muscle_groups WHERE exercise_id = ? AND muscle_group_id = ?",
                [&id, &muscle_group_id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound("Relationship not found".to_string()));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_owned(conn: &Connection, id: &str, user_id: &str) -> Result<Option<Exercise>> {
    let exercise = conn
        .query_row(
            "SELECT * FROM exercises WHERE id = ? AND user_id = ?",
            [id, user_id],
            Exercise::from_row,
        )
        .optional()?;
    Ok(exercise)
}

fn muscle_groups_for(conn: &Connection, exercise_id: &str) -> Result<Vec<MuscleGroup>> {
    let mut stmt = conn.prepare(
        "SELECT mg.* FROM muscle_groups mg
         JOIN exercise_muscle_groups emg ON emg.muscle_group_id = mg.id
         WHERE emg.exercise_id = ?
         ORDER BY mg.name",
    )?;
    let groups = stmt
        .query_map([exercise_id], MuscleGroup::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(groups)
}

fn load_detail(conn: &Connection, id: &str, user_id: &str) -> Result<Option<ExerciseDetail>> {
    let Some(exercise) = find_owned(conn, id, user_id)? else {
        return Ok(None);
    };
    let muscle_groups = muscle_groups_for(conn, id)?;
    Ok(Some(ExerciseDetail {
        exercise,
        muscle_groups,
    }))
}

fn link(conn: &Connection, exercise_id: &str, muscle_group_id: &str, user_id: &str) -> Result<()> {
    sync::require_owned(conn, "muscle_groups", muscle_group_id, user_id, "Muscle group")?;
    conn.execute(
        "INSERT OR IGNORE INTO exercise_muscle_groups (exercise_id, muscle_group_id) VALUES (?, ?)",
        [exercise_id, muscle_group_id],
    )?;
    Ok(())
}

/// Path-addressed links report a foreign or missing id as "not found".
fn ensure_pair_visible(
    conn: &Connection,
    exercise_id: &str,
    muscle_group_id: &str,
    user_id: &str,
) -> Result<()> {
    if find_owned(conn, exercise_id, user_id)?.is_none() {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }
    let owned: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM muscle_groups WHERE id = ? AND user_id = ?",
        [muscle_group_id, user_id],
        |row| row.get(0),
    )?;
    if !owned {
        return Err(AppError::NotFound("Muscle group not found".to_string()));
    }
    Ok(())
}
