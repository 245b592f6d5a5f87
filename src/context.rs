use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::DbPool;
use crate::repositories::{
    BodyWeightRepository, ExerciseRepository, MuscleGroupRepository, RefreshTokenRepository,
    TemplateRepository, UserRepository, WorkoutSessionRepository,
};
use crate::services::{AuthService, TokenIssuer};

/// Everything the router needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub pool: DbPool,
    pub tokens: Arc<TokenIssuer>,
    pub auth_service: AuthService,
    pub user_repo: UserRepository,
    pub exercise_repo: ExerciseRepository,
    pub muscle_group_repo: MuscleGroupRepository,
    pub template_repo: TemplateRepository,
    pub session_repo: WorkoutSessionRepository,
    pub body_weight_repo: BodyWeightRepository,
}

impl AppContext {
    pub fn new(pool: DbPool, auth: &AuthConfig) -> Self {
        let tokens = TokenIssuer::new(auth);
        let user_repo = UserRepository::new(pool.clone());
        let auth_service = AuthService::new(
            user_repo.clone(),
            RefreshTokenRepository::new(pool.clone()),
            tokens.clone(),
            auth.rotate_refresh_tokens,
        );

        Self {
            tokens: Arc::new(tokens),
            auth_service,
            user_repo,
            exercise_repo: ExerciseRepository::new(pool.clone()),
            muscle_group_repo: MuscleGroupRepository::new(pool.clone()),
            template_repo: TemplateRepository::new(pool.clone()),
            session_repo: WorkoutSessionRepository::new(pool.clone()),
            body_weight_repo: BodyWeightRepository::new(pool.clone()),
            pool,
        }
    }
}
