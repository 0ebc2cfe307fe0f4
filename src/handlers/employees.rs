// src/handlers/employees.rs

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
    common::{error::AppError, validation::FieldValidation},
    config::AppState,
    middleware::rbac::{PermEmployeesAccess, PermEmployeesCreate, RequirePermission},
    models::employee::{EmployeeDraft, FieldCheckRequest, StepValidationResponse, ValidateStepRequest},
    services::employee_service,
};

// POST /api/employees/draft/validate
#[utoipa::path(
    post,
    path = "/api/employees/draft/validate",
    tag = "Employees",
    request_body = ValidateStepRequest,
    responses(
        (status = 200, description = "Step is complete", body = StepValidationResponse),
        (status = 403, description = "No access to employees"),
        (status = 422, description = "Field errors or salary mismatch")
    ),
    security(("api_jwt" = []))
)]
pub async fn validate_step(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermEmployeesAccess>,
    Json(payload): Json<ValidateStepRequest>,
) -> Result<Json<StepValidationResponse>, AppError> {
    let today = Utc::now().date_naive();
    app_state
        .employee_service
        .validate_step(&payload.draft, payload.step, today)?;

    Ok(Json(StepValidationResponse {
        step: payload.step,
        valid: true,
        next_step: payload.step.next(),
    }))
}

// POST /api/employees/fields/check
#[utoipa::path(
    post,
    path = "/api/employees/fields/check",
    tag = "Employees",
    request_body = FieldCheckRequest,
    responses(
        (status = 200, description = "Result of a single field check", body = FieldValidation)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_field(Json(payload): Json<FieldCheckRequest>) -> Json<FieldValidation> {
    Json(employee_service::check_field(&payload, Utc::now().date_naive()))
}

// POST /api/employees/submission
#[utoipa::path(
    post,
    path = "/api/employees/submission",
    tag = "Employees",
    request_body = EmployeeDraft,
    responses(
        (status = 200, description = "Normalized payload for the employee API"),
        (status = 403, description = "Creating employees is not allowed"),
        (status = 422, description = "The draft is incomplete")
    ),
    security(("api_jwt" = []))
)]
pub async fn prepare_submission(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermEmployeesCreate>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let payload = app_state
        .employee_service
        .prepare_submission(&draft, Utc::now().date_naive())?;

    tracing::info!(
        "Employee submission prepared for '{}'",
        draft.basic.employee_code.as_deref().unwrap_or_default()
    );
    Ok(Json(payload))
}
