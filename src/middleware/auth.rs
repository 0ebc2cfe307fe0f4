// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::session::SessionContext};

/// Resolves the bearer token to a live session and stores it in the request
/// extensions. Anything else is a 401.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;

    let session = app_state.session_service.resolve(bearer.token()).await?;
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// The session placed by `auth_guard`.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionContext);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::SessionNotFound)
    }
}
