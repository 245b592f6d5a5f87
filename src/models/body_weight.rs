use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyWeight {
    pub id: String,
    pub user_id: String,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

impl FromSqliteRow for BodyWeight {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight_kg: row.get("weight_kg")?,
            recorded_at: row.get("recorded_at")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBodyWeight {
    #[validate(range(exclusive_min = 0.0, message = "weightKg must be positive"))]
    pub weight_kg: f64,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBodyWeight {
    #[validate(range(exclusive_min = 0.0, message = "weightKg must be positive"))]
    pub weight_kg: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}
