use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction};
use uuid::Uuid;

use super::sync::{self, EXERCISE_SETS, SESSION_EXERCISES};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CreateExerciseSet, CreateSessionExercise, CreateWorkoutSession, ExerciseSet, FromSqliteRow,
    SessionExercise, SessionExerciseDetail, UpdateWorkoutSession, WorkoutSession,
    WorkoutSessionDetail,
};

#[derive(Clone)]
pub struct WorkoutSessionRepository {
    pool: DbPool,
}

impl WorkoutSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<WorkoutSessionDetail>> {
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

    /// All sessions of a user with their exercises and sets, most recently
    /// finished first.
    pub async fn find_all_by_user(&self, user_id: &str) -> Result<Vec<WorkoutSessionDetail>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_sessions WHERE user_id = ? ORDER BY finished_at DESC",
            )?;
            let sessions = stmt
                .query_map([&user_id], WorkoutSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut details = Vec::with_capacity(sessions.len());
            for session in sessions {
                let session_exercises = exercises_for(&conn, &session.id)?;
                details.push(WorkoutSessionDetail {
                    session,
                    session_exercises,
                });
            }
            Ok(details)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Insert a session with its exercises and their sets in one transaction.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateWorkoutSession,
    ) -> Result<WorkoutSessionDetail> {
        let pool = self.pool.clone();
        let session = WorkoutSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            workout_template_id: input.workout_template_id,
            started_at: input.started_at,
            finished_at: input.finished_at,
            created_at: Utc::now(),
        };
        let session_exercises = input.session_exercises;

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            if let Some(template_id) = &session.workout_template_id {
                sync::require_owned(
                    &tx,
                    "workout_templates",
                    template_id,
                    &session.user_id,
                    "Workout template",
                )?;
            }

            tx.execute(
                "INSERT INTO workout_sessions (id, user_id, workout_template_id, started_at, finished_at, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    session.id,
                    session.user_id,
                    session.workout_template_id,
                    session.started_at,
                    session.finished_at,
                    session.created_at
                ],
            )?;
            sync::replace_children(
                &tx,
                SESSION_EXERCISES,
                &session.id,
                Some(session_exercises.as_slice()),
                |tx, item| insert_session_exercise(tx, &session.id, &session.user_id, item),
            )?;

            let detail = load_detail(&tx, &session.id, &session.user_id)?
                .ok_or_else(|| AppError::Internal("created session vanished".to_string()))?;
            tx.commit()?;
            Ok(detail)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Apply scalar changes and the three-state `sessionExercises` contract in
    /// one transaction. A populated list replaces every session exercise and
    /// inserts each one's sets fresh.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateWorkoutSession,
    ) -> Result<Option<WorkoutSessionDetail>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let Some(mut session) = find_owned(&tx, &id, &user_id)? else {
                return Ok(None);
            };

            if let Some(template_id) = input.workout_template_id {
                if let Some(template_id) = &template_id {
                    sync::require_owned(
                        &tx,
                        "workout_templates",
                        template_id,
                        &user_id,
                        "Workout template",
                    )?;
                }
                session.workout_template_id = template_id;
            }
            if let Some(started_at) = input.started_at {
                session.started_at = started_at;
            }
            if let Some(finished_at) = input.finished_at {
                session.finished_at = finished_at;
            }

            tx.execute(
                "UPDATE workout_sessions SET workout_template_id = ?, started_at = ?, finished_at = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    session.workout_template_id,
                    session.started_at,
                    session.finished_at,
                    id,
                    user_id
                ],
            )?;
            sync::replace_children(
                &tx,
                SESSION_EXERCISES,
                &id,
                input.session_exercises.as_deref(),
                |tx, item| insert_session_exercise(tx, &id, &user_id, item),
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
                "DELETE FROM workout_sessions WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_owned(conn: &Connection, id: &str, user_id: &str) -> Result<Option<WorkoutSession>> {
    let session = conn
        .query_row(
            "SELECT * FROM workout_sessions WHERE id = ? AND user_id = ?",
            [id, user_id],
            WorkoutSession::from_row,
        )
        .optional()?;
    Ok(session)
}

fn exercises_for(conn: &Connection, session_id: &str) -> Result<Vec<SessionExerciseDetail>> {
    let mut stmt = conn.prepare(
        "SELECT se.*, e.name AS exercise_name
         FROM session_exercises se
         JOIN exercises e ON se.exercise_id = e.id
         WHERE se.workout_session_id = ?
         ORDER BY se.position, se.rowid",
    )?;
    let session_exercises = stmt
        .query_map([session_id], SessionExercise::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut sets_stmt = conn.prepare(
        "SELECT * FROM exercise_sets WHERE session_exercise_id = ? ORDER BY set_number, rowid",
    )?;
    let mut details = Vec::with_capacity(session_exercises.len());
    for session_exercise in session_exercises {
        let exercise_sets = sets_stmt
            .query_map([&session_exercise.id], ExerciseSet::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        details.push(SessionExerciseDetail {
            session_exercise,
            exercise_sets,
        });
    }
    Ok(details)
}

fn load_detail(conn: &Connection, id: &str, user_id: &str) -> Result<Option<WorkoutSessionDetail>> {
    let Some(session) = find_owned(conn, id, user_id)? else {
        return Ok(None);
    };
    let session_exercises = exercises_for(conn, id)?;
    Ok(Some(WorkoutSessionDetail {
        session,
        session_exercises,
    }))
}

/// Insert one session exercise, then its sets through the same child
/// replacement used one level up.
fn insert_session_exercise(
    tx: &Transaction<'_>,
    session_id: &str,
    user_id: &str,
    item: &CreateSessionExercise,
) -> Result<()> {
    sync::require_owned(tx, "exercises", &item.exercise_id, user_id, "Exercise")?;

    let session_exercise_id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO session_exercises (id, workout_session_id, exercise_id, position)
         VALUES (?, ?, ?, ?)",
        rusqlite::params![session_exercise_id, session_id, item.exercise_id, item.position],
    )?;

    sync::replace_children(
        tx,
        EXERCISE_SETS,
        &session_exercise_id,
        item.exercise_sets.as_deref(),
        |tx, set| insert_set(tx, &session_exercise_id, set),
    )?;
    Ok(())
}

fn insert_set(conn: &Connection, session_exercise_id: &str, set: &CreateExerciseSet) -> Result<()> {
    conn.execute(
        "INSERT INTO exercise_sets (id, session_exercise_id, set_number, reps, weight, completed)
         VALUES (?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            Uuid::new_v4().to_string(),
            session_exercise_id,
            set.set_number,
            set.reps,
            set.weight,
            set.completed
        ],
    )?;
    Ok(())
}
