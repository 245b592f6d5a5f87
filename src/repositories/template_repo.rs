use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::sync::{self, TEMPLATE_EXERCISES};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CreateTemplateExercise, CreateWorkoutTemplate, FromSqliteRow, TemplateExercise,
    UpdateWorkoutTemplate, WorkoutTemplate, WorkoutTemplateDetail,
};
use crate::validation::trimmed;

#[derive(Clone)]
pub struct TemplateRepository {
    pool: DbPool,
}

impl TemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<WorkoutTemplateDetail>> {
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

    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<WorkoutTemplateDetail>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_templates WHERE user_id = ? ORDER BY created_at DESC, name",
            )?;
            let templates = stmt
                .query_map([&user_id], WorkoutTemplate::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let details = templates
                .into_iter()
                .map(|template| {
                    let template_exercises = exercises_for(&conn, &template.id)?;
                    Ok(WorkoutTemplateDetail {
                        template,
                        template_exercises,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(details)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Insert the template and its exercises atomically.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateWorkoutTemplate,
    ) -> Result<WorkoutTemplateDetail> {
        let pool = self.pool.clone();
        let template = WorkoutTemplate {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: trimmed(&input.name),
            created_at: Utc::now(),
        };

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO workout_templates (id, user_id, name, created_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    template.id,
                    template.user_id,
                    template.name,
                    template.created_at
                ],
            )?;
            sync::replace_children(
                &tx,
                TEMPLATE_EXERCISES,
                &template.id,
                Some(input.template_exercises.as_slice()),
                |tx, item| insert_exercise(tx, &template.id, &template.user_id, item),
            )?;
            let detail = load_detail(&tx, &template.id, &template.user_id)?
                .ok_or_else(|| AppError::Internal("created template vanished".to_string()))?;
            tx.commit()?;
            Ok(detail)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Update the name and apply the three-state `templateExercises` contract,
    /// all in one transaction.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateWorkoutTemplate,
    ) -> Result<Option<WorkoutTemplateDetail>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            if find_owned(&tx, &id, &user_id)?.is_none() {
                return Ok(None);
            }

            if let Some(name) = &input.name {
                tx.execute(
                    "UPDATE workout_templates SET name = ? WHERE id = ? AND user_id = ?",
                    [&trimmed(name), &id, &user_id],
                )?;
            }
            sync::replace_children(
                &tx,
                TEMPLATE_EXERCISES,
                &id,
                input.template_exercises.as_deref(),
                |tx, item| insert_exercise(tx, &id, &user_id, item),
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
                "DELETE FROM workout_templates WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_owned(conn: &Connection, id: &str, user_id: &str) -> Result<Option<WorkoutTemplate>> {
    let template = conn
        .query_row(
            "SELECT * FROM workout_templates WHERE id = ? AND user_id = ?",
            [id, user_id],
            WorkoutTemplate::from_row,
        )
        .optional()?;
    Ok(template)
}

fn exercises_for(conn: &Connection, template_id: &str) -> Result<Vec<TemplateExercise>> {
    let mut stmt = conn.prepare(
        "SELECT te.*, e.name AS exercise_name
         FROM template_exercises te
         JOIN exercises e ON te.exercise_id = e.id
         WHERE te.workout_template_id = ?
         ORDER BY te.position, te.rowid",
    )?;
    let rows = stmt
        .query_map([template_id], TemplateExercise::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn load_detail(
    conn: &Connection,
    id: &str,
    user_id: &str,
) -> Result<Option<WorkoutTemplateDetail>> {
    let Some(template) = find_owned(conn, id, user_id)? else {
        return Ok(None);
    };
    let template_exercises = exercises_for(conn, id)?;
    Ok(Some(WorkoutTemplateDetail {
        template,
        template_exercises,
    }))
}

fn insert_exercise(
    conn: &Connection,
    template_id: &str,
    user_id: &str,
    item: &CreateTemplateExercise,
) -> Result<()> {
    sync::require_owned(conn, "exercises", &item.exercise_id, user_id, "Exercise")?;
    conn.execute(
        "INSERT INTO template_exercises (id, workout_template_id, exercise_id, sets, reps, weight, position)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            Uuid::new_v4().to_string(),
            template_id,
            item.exercise_id,
            item.sets,
            item.reps,
            item.weight,
            item.position
        ],
    )?;
    Ok(())
}
