// src/handlers/session.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::{
        permission::PermissionSet,
        session::{OpenSessionPayload, SessionResponse, SessionSnapshot},
    },
};

// POST /api/session/login
#[utoipa::path(
    post,
    path = "/api/session/login",
    tag = "Session",
    request_body = OpenSessionPayload,
    responses(
        (status = 201, description = "Session opened", body = SessionResponse),
        (status = 400, description = "Invalid user payload")
    )
)]
pub async fn open_session(
    State(app_state): State<AppState>,
    Json(payload): Json<OpenSessionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let permissions = PermissionSet::from_value(&payload.permissions);
    let (token, session) = app_state
        .session_service
        .open_session(payload.user, permissions)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { token, expires_at: session.expires_at }),
    ))
}

// GET /api/session/me
#[utoipa::path(
    get,
    path = "/api/session/me",
    tag = "Session",
    responses(
        (status = 200, description = "Current user and permission snapshot", body = SessionSnapshot),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(CurrentSession(session): CurrentSession) -> Json<SessionSnapshot> {
    Json(SessionSnapshot::from(&session))
}

// POST /api/session/logout
#[utoipa::path(
    post,
    path = "/api/session/logout",
    tag = "Session",
    responses(
        (status = 204, description = "Session closed")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_session(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    app_state.session_service.close(session.id).await;
    StatusCode::NO_CONTENT
}
