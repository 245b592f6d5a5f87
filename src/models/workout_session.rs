use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::patch::double_option;
use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub workout_template_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_template_id: row.get("workout_template_id")?,
            started_at: row.get("started_at")?,
            finished_at: row.get("finished_at")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExercise {
    pub id: String,
    pub workout_session_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub position: i64,
}

impl FromSqliteRow for SessionExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_session_id: row.get("workout_session_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            position: row.get("position")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: String,
    pub session_exercise_id: String,
    pub set_number: i64,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub completed: bool,
}

impl FromSqliteRow for ExerciseSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_exercise_id: row.get("session_exercise_id")?,
            set_number: row.get("set_number")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            completed: row.get("completed")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExerciseDetail {
    #[serde(flatten)]
    pub session_exercise: SessionExercise,
    pub exercise_sets: Vec<ExerciseSet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub session_exercises: Vec<SessionExerciseDetail>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseSet {
    #[validate(range(min = 1, message = "setNumber must be a positive integer"))]
    pub set_number: i64,
    #[validate(range(min = 1, message = "reps must be a positive integer"))]
    pub reps: Option<i64>,
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// A session exercise with its sets. Sets are always inserted fresh; an
/// absent `exerciseSets` yields a session exercise with no sets.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionExercise {
    #[validate(length(min = 1, message = "exerciseId is required"))]
    pub exercise_id: String,
    #[validate(range(min = 1, message = "position must be a positive integer"))]
    pub position: i64,
    #[validate(nested)]
    pub exercise_sets: Option<Vec<CreateExerciseSet>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutSession {
    pub workout_template_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    #[serde(default)]
    #[validate(nested)]
    pub session_exercises: Vec<CreateSessionExercise>,
}

/// Partial update. `workoutTemplateId`/`startedAt` accept `null` to clear.
/// `sessionExercises` absent keeps the tree, `[]` clears it, a populated list
/// replaces every session exercise and its sets.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutSession {
    #[serde(default, deserialize_with = "double_option")]
    pub workout_template_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub finished_at: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub session_exercises: Option<Vec<CreateSessionExercise>>,
}
