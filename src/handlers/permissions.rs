// src/handlers/permissions.rs

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    middleware::{
        auth::CurrentSession,
        rbac::{PermGroupsEdit, RequirePermission},
    },
    models::permission::{ModuleId, PermissionKind, PermissionSet},
    services::permission_service::{self, PermissionEngine},
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PermissionCheckQuery {
    #[validate(length(min = 1, message = "Module is required."))]
    pub module: String,
    #[serde(default)]
    pub kind: PermissionKind,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckResponse {
    pub module: ModuleId,
    pub kind: PermissionKind,
    pub has_permission: bool,
    /// True when the module or anything below it is reachable.
    pub has_any_permission: bool,
}

// Group editor checkbox change
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePayload {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub permissions: Value,

    #[validate(length(min = 1, message = "Module is required."))]
    #[schema(example = "hrm_employees")]
    pub module: String,

    pub kind: PermissionKind,
    pub value: bool,
}

// GET /api/permissions/check
#[utoipa::path(
    get,
    path = "/api/permissions/check",
    tag = "Permissions",
    params(PermissionCheckQuery),
    responses(
        (status = 200, description = "Whether the session holds the permission", body = PermissionCheckResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_permission(
    CurrentSession(session): CurrentSession,
    Query(query): Query<PermissionCheckQuery>,
) -> Result<Json<PermissionCheckResponse>, AppError> {
    query.validate().map_err(AppError::ValidationError)?;

    let engine = PermissionEngine::for_session(&session);
    let module = ModuleId::new(query.module.trim());
    Ok(Json(PermissionCheckResponse {
        has_permission: engine.has_permission(&module, query.kind),
        has_any_permission: engine.has_any_permission(&module),
        module,
        kind: query.kind,
    }))
}

// POST /api/permissions/reconcile
#[utoipa::path(
    post,
    path = "/api/permissions/reconcile",
    tag = "Permissions",
    request_body = ReconcilePayload,
    responses(
        (status = 200, description = "Permission map after the change"),
        (status = 403, description = "Editing groups is not allowed")
    ),
    security(("api_jwt" = []))
)]
pub async fn reconcile_permissions(
    _guard: RequirePermission<PermGroupsEdit>,
    Json(payload): Json<ReconcilePayload>,
) -> Result<Json<PermissionSet>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let permissions = PermissionSet::from_value(&payload.permissions);
    let module = ModuleId::new(payload.module.trim());
    let updated = permission_service::reconcile(&permissions, &module, payload.kind, payload.value);

    Ok(Json(updated))
}
