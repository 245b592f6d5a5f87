use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::handlers::{
    auth, body_weights, exercises, health, muscle_groups, users, workout_sessions,
    workout_templates,
};

pub fn create_router(ctx: AppContext) -> Router {
    let api: Router = Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/logout-all", post(auth::logout_all))
        .with_state(auth::AuthState {
            auth_service: ctx.auth_service.clone(),
        })
        // Users
        .route("/users", post(users::register))
        .route(
            "/users/{user_id}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .with_state(users::UsersState {
            user_repo: ctx.user_repo.clone(),
        })
        // Exercises
        .route("/exercises", get(exercises::list).post(exercises::create))
        .route(
            "/exercises/{exercise_id}",
            get(exercises::show)
                .patch(exercises::update)
                .delete(exercises::delete),
        )
        .route(
            "/exercises/{exercise_id}/muscle-groups",
            get(exercises::list_muscle_groups),
        )
        .route(
            "/exercises/{exercise_id}/muscle-groups/{muscle_group_id}",
            post(exercises::add_muscle_group).delete(exercises::remove_muscle_group),
        )
        .with_state(exercises::ExercisesState {
            exercise_repo: ctx.exercise_repo.clone(),
        })
        // Muscle groups
        .route(
            "/muscle-groups",
            get(muscle_groups::list).post(muscle_groups::create),
        )
        .route(
            "/muscle-groups/{muscle_group_id}",
            get(muscle_groups::show)
                .patch(muscle_groups::update)
                .delete(muscle_groups::delete),
        )
        .with_state(muscle_groups::MuscleGroupsState {
            muscle_group_repo: ctx.muscle_group_repo.clone(),
        })
        // Workout templates
        .route(
            "/workout-templates",
            get(workout_templates::list).post(workout_templates::create),
        )
        .route(
            "/workout-templates/{workout_template_id}",
            get(workout_templates::show)
                .patch(workout_templates::update)
                .delete(workout_templates::delete),
        )
        .with_state(workout_templates::TemplatesState {
            template_repo: ctx.template_repo.clone(),
        })
        // Workout sessions
        .route(
            "/workout-sessions",
            get(workout_sessions::list).post(workout_sessions::create),
        )
        .route(
            "/workout-sessions/{workout_session_id}",
            get(workout_sessions::show)
                .patch(workout_sessions::update)
                .delete(workout_sessions::delete),
        )
        .with_state(workout_sessions::SessionsState {
            session_repo: ctx.session_repo.clone(),
        })
        // Body weights
        .route(
            "/body-weights",
            get(body_weights::list).post(body_weights::create),
        )
        .route("/body-weights/latest", get(body_weights::latest))
        .route(
            "/body-weights/{body_weight_id}",
            get(body_weights::show)
                .patch(body_weights::update)
                .delete(body_weights::delete),
        )
        .with_state(body_weights::BodyWeightsState {
            body_weight_repo: ctx.body_weight_repo.clone(),
        });

    Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            pool: ctx.pool.clone(),
        })
        .nest("/api", api)
        // Token verification for the AuthUser extractor
        .layer(Extension(ctx.tokens))
        .layer(TraceLayer::new_for_http())
}
