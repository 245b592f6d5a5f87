use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::FromSqliteRow;
use crate::validation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroup {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for MuscleGroup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMuscleGroup {
    #[validate(custom(function = "validation::name"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMuscleGroup {
    #[validate(custom(function = "validation::name"))]
    pub name: Option<String>,
}
