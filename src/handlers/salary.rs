// src/handlers/salary.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::salary::{AllocationSummary, ApplySalaryEditRequest, Balance, BalanceRequest, SalaryStructure},
    services::salary_service,
};

// POST /api/salary/apply
#[utoipa::path(
    post,
    path = "/api/salary/apply",
    tag = "Salary",
    request_body = ApplySalaryEditRequest,
    responses(
        (status = 200, description = "Structure after the edit", body = SalaryStructure),
        (status = 404, description = "Unknown component"),
        (status = 400, description = "Standard components cannot be removed")
    ),
    security(("api_jwt" = []))
)]
pub async fn apply_edit(Json(payload): Json<ApplySalaryEditRequest>) -> Result<Json<SalaryStructure>, AppError> {
    let updated = salary_service::apply(&payload.structure, &payload.edit)?;
    Ok(Json(updated))
}

// POST /api/salary/balance
#[utoipa::path(
    post,
    path = "/api/salary/balance",
    tag = "Salary",
    request_body = BalanceRequest,
    responses(
        (status = 200, description = "Unallocated remainder", body = Balance),
        (status = 422, description = "Amounts too large to calculate with")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_balance(Json(payload): Json<BalanceRequest>) -> Result<Json<Balance>, AppError> {
    let balance = salary_service::calculate_balance_for_new_component(
        &payload.structure,
        payload.excluding_key.as_deref(),
    )?;
    Ok(Json(balance))
}

// POST /api/salary/validate
#[utoipa::path(
    post,
    path = "/api/salary/validate",
    tag = "Salary",
    request_body = SalaryStructure,
    responses(
        (status = 200, description = "Allocation adds up", body = AllocationSummary),
        (status = 422, description = "Salary missing or components do not add up")
    ),
    security(("api_jwt" = []))
)]
pub async fn validate_allocation(
    State(app_state): State<AppState>,
    Json(structure): Json<SalaryStructure>,
) -> Result<Json<AllocationSummary>, AppError> {
    salary_service::validate_allocation(&structure, &app_state.config.currency_code)?;

    Ok(Json(AllocationSummary {
        monthly_salary: structure.monthly_salary,
        total: salary_service::calculate_total(&structure)?,
        balanced: true,
    }))
}
