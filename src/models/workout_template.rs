use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::FromSqliteRow;
use crate::validation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutTemplate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A prescribed exercise within a template. `position` orders the rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub id: String,
    pub workout_template_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub position: i64,
}

impl FromSqliteRow for TemplateExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_template_id: row.get("workout_template_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            position: row.get("position")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplateDetail {
    #[serde(flatten)]
    pub template: WorkoutTemplate,
    pub template_exercises: Vec<TemplateExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateExercise {
    #[validate(length(min = 1, message = "Exercise ID is required"))]
    pub exercise_id: String,
    #[validate(range(min = 1, message = "Sets must be a positive integer"))]
    pub sets: i64,
    #[validate(range(min = 1, message = "Reps must be a positive integer"))]
    pub reps: i64,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    #[validate(range(min = 1, message = "Position must be a positive integer"))]
    pub position: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutTemplate {
    #[validate(custom(function = "validation::name"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "At least one template exercise is required"),
        nested
    )]
    pub template_exercises: Vec<CreateTemplateExercise>,
}

/// Partial update. `templateExercises` absent keeps the rows, `[]` clears
/// them, a populated list replaces them.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutTemplate {
    #[validate(custom(function = "validation::name"))]
    pub name: Option<String>,
    #[validate(nested)]
    pub template_exercises: Option<Vec<CreateTemplateExercise>>,
}
