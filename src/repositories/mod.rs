pub mod body_weight_repo;
pub mod exercise_repo;
pub mod muscle_group_repo;
pub mod refresh_token_repo;
pub mod sync;
pub mod template_repo;
pub mod user_repo;
pub mod workout_session_repo;

pub use body_weight_repo::BodyWeightRepository;
pub use exercise_repo::ExerciseRepository;
pub use muscle_group_repo::MuscleGroupRepository;
pub use refresh_token_repo::RefreshTokenRepository;
pub use template_repo::TemplateRepository;
pub use user_repo::UserRepository;
pub use workout_session_repo::WorkoutSessionRepository;
