//! Session logging endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rehab_common::db::{sessions, SessionFilter};
use rehab_common::models::{NewSession, Session, SessionUpdate};

use super::parse_id;
use crate::extract::{ApiJson, ApiQuery};
use crate::{ApiResult, AppState};

/// POST /sessions
///
/// 400 when `exercise_id` does not resolve to an exercise.
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewSession>,
) -> ApiResult<Json<Session>> {
    payload.validate()?;
    let session = sessions::create_session(&state.db, payload).await?;
    state.metrics.session_logged();
    Ok(Json(session))
}

/// GET /sessions?from_date=&to_date=&exercise_id=
pub async fn list_sessions(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<SessionFilter>,
) -> ApiResult<Json<Vec<Session>>> {
    Ok(Json(sessions::list_sessions(&state.db, &filter).await?))
}

/// GET /sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Session>> {
    let id = parse_id("Session", &id)?;
    Ok(Json(sessions::get_session(&state.db, id).await?))
}

/// PUT /sessions/:id
///
/// 404 for an unknown session takes precedence over 400 for an unknown
/// target exercise.
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SessionUpdate>,
) -> ApiResult<Json<Session>> {
    let id = parse_id("Session", &id)?;
    payload.validate()?;
    Ok(Json(sessions::update_session(&state.db, id, payload).await?))
}

/// DELETE /sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("Session", &id)?;
    sessions::delete_session(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
}
