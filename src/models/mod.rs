pub mod body_weight;
pub mod exercise;
pub mod from_row;
pub mod muscle_group;
pub mod patch;
pub mod refresh_token;
pub mod user;
pub mod workout_session;
pub mod workout_template;

pub use body_weight::{BodyWeight, CreateBodyWeight, UpdateBodyWeight};
pub use exercise::{CreateExercise, Exercise, ExerciseDetail, UpdateExercise};
pub use from_row::FromSqliteRow;
pub use muscle_group::{CreateMuscleGroup, MuscleGroup, UpdateMuscleGroup};
pub use refresh_token::RefreshToken;
pub use user::{CreateUser, Gender, LoginCredentials, UpdateUser, User};
pub use workout_session::{
    CreateExerciseSet, CreateSessionExercise, CreateWorkoutSession, ExerciseSet,
    SessionExercise, SessionExerciseDetail, UpdateWorkoutSession, WorkoutSession,
    WorkoutSessionDetail,
};
pub use workout_template::{
    CreateTemplateExercise, CreateWorkoutTemplate, TemplateExercise, UpdateWorkoutTemplate,
    WorkoutTemplate, WorkoutTemplateDetail,
};
