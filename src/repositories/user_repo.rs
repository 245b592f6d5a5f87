use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateUser, FromSqliteRow, UpdateUser, User};
use crate::validation::{normalize_email, trimmed};

/// Hash checked against when the email is unknown, so both login failures
/// cost one argon2 verification.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let email = normalize_email(email);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?")?;
            let result = stmt.query_row([&email], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, input: CreateUser) -> Result<User> {
        let password_hash = hash_password(&input.password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: trimmed(&input.first_name),
            last_name: trimmed(&input.last_name),
            email: normalize_email(&input.email),
            password_hash,
            birth_date: input.birth_date,
            height_cm: input.height_cm,
            gender: input.gender,
            created_at: Utc::now(),
        };

        let pool = self.pool.clone();
        let user_clone = user.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (id, first_name, last_name, email, password_hash, birth_date, height_cm, gender, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    user_clone.id,
                    user_clone.first_name,
                    user_clone.last_name,
                    user_clone.email,
                    user_clone.password_hash,
                    user_clone.birth_date,
                    user_clone.height_cm,
                    user_clone.gender.map(|g| g.as_str()),
                    user_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Apply a partial profile update. A new password is re-hashed; the
    /// plaintext never reaches the store.
    pub async fn update(&self, id: &str, input: UpdateUser) -> Result<Option<User>> {
        let password_hash = input.password.as_deref().map(hash_password).transpose()?;
        let pool = self.pool.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let existing = tx
                .query_row("SELECT * FROM users WHERE id = ?", [&id], User::from_row)
                .optional()?;
            let Some(mut user) = existing else {
                return Ok(None);
            };

            if let Some(first_name) = input.first_name {
                user.first_name = trimmed(&first_name);
            }
            if let Some(last_name) = input.last_name {
                user.last_name = trimmed(&last_name);
            }
            if let Some(email) = input.email {
                user.email = normalize_email(&email);
            }
            if let Some(hash) = password_hash {
                user.password_hash = hash;
            }
            if let Some(birth_date) = input.birth_date {
                user.birth_date = birth_date;
            }
            if let Some(height_cm) = input.height_cm {
                user.height_cm = height_cm;
            }
            if let Some(gender) = input.gender {
                user.gender = Some(gender);
            }

            tx.execute(
                "UPDATE users SET first_name = ?, last_name = ?, email = ?, password_hash = ?,
                    birth_date = ?, height_cm = ?, gender = ?
                 WHERE id = ?",
                rusqlite::params![
                    user.first_name,
                    user.last_name,
                    user.email,
                    user.password_hash,
                    user.birth_date,
                    user.height_cm,
                    user.gender.map(|g| g.as_str()),
                    user.id
                ],
            )?;
            tx.commit()?;

            Ok(Some(user))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Look up by email and check the password. Unknown email and wrong
    /// password both yield `None`.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_by_email(email).await?;

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => {
                verify_password(password, dummy_hash()?)?;
                Ok(None)
            }
        }
    }

    /// Delete the account; owned rows go with it through `ON DELETE CASCADE`.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM users WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn dummy_hash() -> Result<&'static str> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("fittrack-dummy-password")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
