// src/handlers/navigation.rs

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::navigation::{NavItem, RouteDecision, RouteQuery},
    services::{navigation_service, permission_service::PermissionEngine},
};

// GET /api/navigation
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "Navigation",
    responses(
        (status = 200, description = "Sidebar items the session may see", body = [NavItem])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_navigation(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<Vec<NavItem>> {
    let engine = PermissionEngine::for_session(&session);
    Json(app_state.navigation.visible_items(&engine))
}

// GET /api/navigation/route?path=/hrm/employees/new
#[utoipa::path(
    get,
    path = "/api/navigation/route",
    tag = "Navigation",
    params(RouteQuery),
    responses(
        (status = 200, description = "Whether the route may be opened", body = RouteDecision)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_route(
    CurrentSession(session): CurrentSession,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteDecision>, AppError> {
    query.validate().map_err(AppError::ValidationError)?;

    let engine = PermissionEngine::for_session(&session);
    Ok(Json(navigation_service::check_route(&query.path, &engine)))
}
