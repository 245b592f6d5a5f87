use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::patch::double_option;
use super::{FromSqliteRow, MuscleGroup};
use crate::validation::{self, DESCRIPTION_MAX, NAME_MAX};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub equipment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            equipment: row.get("equipment")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetail {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub muscle_groups: Vec<MuscleGroup>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExercise {
    #[validate(custom(function = "validation::name"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be less than 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Equipment must be less than 100 characters"))]
    pub equipment: Option<String>,
    pub muscle_group_ids: Option<Vec<String>>,
}

/// Partial update. `description`/`equipment` accept `null` to clear; an absent
/// `muscleGroupIds` keeps the links, `[]` removes them, a list replaces them.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_exercise"))]
pub struct UpdateExercise {
    #[validate(custom(function = "validation::name"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equipment: Option<Option<String>>,
    pub muscle_group_ids: Option<Vec<String>>,
}

fn validate_update_exercise(update: &UpdateExercise) -> Result<(), ValidationError> {
    let too_long = |value: &Option<Option<String>>, max: usize| {
        matches!(value, Some(Some(v)) if v.chars().count() > max)
    };
    if too_long(&update.description, DESCRIPTION_MAX) {
        let mut err = ValidationError::new("description");
        err.message = Some("Description must be less than 1000 characters".into());
        return Err(err);
    }
    if too_long(&update.equipment, NAME_MAX) {
        let mut err = ValidationError::new("equipment");
        err.message = Some("Equipment must be less than 100 characters".into());
        return Err(err);
    }
    Ok(())
}
