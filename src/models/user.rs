use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{patch, FromSqliteRow};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "non-binary")]
    NonBinary,
    #[serde(rename = "prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non-binary",
            Gender::PreferNotToSay => "prefer not to say",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "non-binary" => Some(Gender::NonBinary),
            "prefer not to say" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub birth_date: NaiveDate,
    pub height_cm: i64,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            birth_date: row.get("birth_date")?,
            height_cm: row.get("height_cm")?,
            gender: gender.as_deref().and_then(Gender::parse),
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(custom(function = "validation::name"))]
    pub first_name: String,
    #[validate(custom(function = "validation::name"))]
    pub last_name: String,
    #[serde(deserialize_with = "patch::email")]
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(custom(function = "validation::not_in_future"))]
    pub birth_date: NaiveDate,
    #[validate(range(min = 1, max = 300, message = "Height must be between 1 and 300 cm"))]
    pub height_cm: i64,
    pub gender: Option<Gender>,
}

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(custom(function = "validation::name"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validation::name"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "patch::optional_email")]
    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(custom(function = "validation::not_in_future"))]
    pub birth_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 300, message = "Height must be between 1 and 300 cm"))]
    pub height_cm: Option<i64>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginCredentials {
    #[serde(deserialize_with = "patch::email")]
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
