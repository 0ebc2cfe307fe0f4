// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Field -> message, produced by the form validators
    #[error("One or more fields are invalid")]
    FieldErrors(BTreeMap<String, String>),

    #[error("Monthly salary must be greater than zero")]
    NonPositiveSalary,

    #[error("Total salary ({actual}) does not match monthly salary ({expected})")]
    SalaryMismatch { expected: String, actual: String },

    #[error("Amount is too large to calculate with")]
    AmountOutOfRange,

    #[error("Unknown salary component '{0}'")]
    UnknownSalaryComponent(String),

    #[error("Salary component '{0}' is not a custom component and cannot be removed")]
    ComponentNotRemovable(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Permission '{kind}' on module '{module}' is required")]
    Forbidden { module: String, kind: String },

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::FieldErrors(_)
            | AppError::NonPositiveSalary
            | AppError::SalaryMismatch { .. }
            | AppError::AmountOutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnknownSalaryComponent(_) => StatusCode::NOT_FOUND,
            AppError::ComponentNotRemovable(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken | AppError::SessionNotFound => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::JwtError(_) | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "error": "One or more fields are invalid.", "details": details })
            }
            AppError::FieldErrors(details) => {
                json!({ "error": self.to_string(), "details": details })
            }
            AppError::JwtError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Internal server error: {:?}", self);
                json!({ "error": "An unexpected error occurred." })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
