//! Exercise CRUD endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rehab_common::db::exercises;
use rehab_common::models::{Exercise, ExerciseUpdate, NewExercise};

use super::parse_id;
use crate::extract::ApiJson;
use crate::{ApiResult, AppState};

/// POST /exercises
pub async fn create_exercise(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewExercise>,
) -> ApiResult<Json<Exercise>> {
    payload.validate()?;
    let exercise = exercises::create_exercise(&state.db, payload).await?;
    state.metrics.exercise_created();
    Ok(Json(exercise))
}

/// GET /exercises
pub async fn list_exercises(State(state): State<AppState>) -> ApiResult<Json<Vec<Exercise>>> {
    Ok(Json(exercises::list_exercises(&state.db).await?))
}

/// GET /exercises/:id
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Exercise>> {
    let id = parse_id("Exercise", &id)?;
    Ok(Json(exercises::get_exercise(&state.db, id).await?))
}

/// PUT /exercises/:id
///
/// Partial update: only fields present in the body change.
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ExerciseUpdate>,
) -> ApiResult<Json<Exercise>> {
    let id = parse_id("Exercise", &id)?;
    payload.validate()?;
    Ok(Json(exercises::update_exercise(&state.db, id, payload).await?))
}

/// DELETE /exercises/:id
///
/// Also removes every session logged against the exercise.
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("Exercise", &id)?;
    exercises::delete_exercise(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
}
