// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Everything below needs a live session
    let session_routes = Router::new()
        .route("/me", get(handlers::session::get_me))
        .route("/logout", post(handlers::session::close_session))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let permission_routes = Router::new()
        .route("/check", get(handlers::permissions::check_permission))
        .route("/reconcile", post(handlers::permissions::reconcile_permissions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let navigation_routes = Router::new()
        .route("/", get(handlers::navigation::get_navigation))
        .route("/route", get(handlers::navigation::check_route))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let salary_routes = Router::new()
        .route("/apply", post(handlers::salary::apply_edit))
        .route("/balance", post(handlers::salary::get_balance))
        .route("/validate", post(handlers::salary::validate_allocation))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let employee_routes = Router::new()
        .route("/draft/validate", post(handlers::employees::validate_step))
        .route("/fields/check", post(handlers::employees::check_field))
        .route("/submission", post(handlers::employees::prepare_submission))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/session/login", post(handlers::session::open_session))
        .nest("/api/session", session_routes)
        .nest("/api/permissions", permission_routes)
        .nest("/api/navigation", navigation_routes)
        .nest("/api/salary", salary_routes)
        .nest("/api/employees", employee_routes)
        .with_state(app_state)
}
