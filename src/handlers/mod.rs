pub mod auth;
pub mod body_weights;
pub mod exercises;
pub mod health;
pub mod muscle_groups;
pub mod users;
pub mod workout_sessions;
pub mod workout_templates;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
