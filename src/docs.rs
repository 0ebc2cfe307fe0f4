// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Session ---
        handlers::session::open_session,
        handlers::session::get_me,
        handlers::session::close_session,

        // --- Permissions ---
        handlers::permissions::check_permission,
        handlers::permissions::reconcile_permissions,

        // --- Navigation ---
        handlers::navigation::get_navigation,
        handlers::navigation::check_route,

        // --- Salary ---
        handlers::salary::apply_edit,
        handlers::salary::get_balance,
        handlers::salary::validate_allocation,

        // --- Employees ---
        handlers::employees::validate_step,
        handlers::employees::check_field,
        handlers::employees::prepare_submission,
    ),
    components(
        schemas(
            // --- Session ---
            models::permission::Subject,
            models::session::OpenSessionPayload,
            models::session::SessionResponse,
            models::session::SessionSnapshot,

            // --- Permissions ---
            models::permission::ModuleId,
            models::permission::PermissionKind,
            models::permission::PermissionRecord,
            handlers::permissions::PermissionCheckResponse,
            handlers::permissions::ReconcilePayload,

            // --- Navigation ---
            models::navigation::NavItem,
            models::navigation::RouteDecision,

            // --- Salary ---
            models::salary::SalaryComponent,
            models::salary::SalaryStructure,
            models::salary::SalaryEdit,
            models::salary::Balance,
            models::salary::ApplySalaryEditRequest,
            models::salary::BalanceRequest,
            models::salary::AllocationSummary,

            // --- Employees ---
            models::employee::BasicInfo,
            models::employee::PersonalInfo,
            models::employee::EmployeeDraft,
            models::employee::OnboardingStep,
            models::employee::ValidateStepRequest,
            models::employee::StepValidationResponse,
            models::employee::FieldRule,
            models::employee::FieldCheckRequest,
            common::validation::FieldValidation,
        )
    ),
    tags(
        (name = "Session", description = "Login context and logout"),
        (name = "Permissions", description = "Permission checks and group editor reconciliation"),
        (name = "Navigation", description = "Sidebar visibility and route guards"),
        (name = "Salary", description = "Monthly salary allocation"),
        (name = "Employees", description = "Employee onboarding form")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
