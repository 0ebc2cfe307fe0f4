// src/models/employee.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::salary::SalaryStructure;

/// Form inputs arrive as text, but clients sometimes send numbers or booleans.
/// Everything is read back as a string; `null` and structured values become `None`.
fn form_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// --- Step 1: basic information ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    #[serde(deserialize_with = "form_string")]
    #[schema(example = "EMP-0042")]
    pub employee_code: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "Fatima")]
    pub first_name: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "Khan")]
    pub last_name: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "fatima.khan@example.com")]
    pub email: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "+971501234567")]
    pub phone: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "1992-04-18")]
    pub date_of_birth: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "2026-11-01")]
    pub joining_date: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "Finance")]
    pub department: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "Accountant")]
    pub designation: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "6")]
    pub probation_months: Option<String>,
}

// --- Step 3: personal information ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "form_string")]
    #[schema(example = "female")]
    pub gender: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "single")]
    pub marital_status: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "AE")]
    pub nationality: Option<String>,

    #[serde(deserialize_with = "form_string")]
    pub address: Option<String>,

    #[serde(deserialize_with = "form_string")]
    pub emergency_contact_name: Option<String>,

    #[serde(deserialize_with = "form_string")]
    pub emergency_contact_phone: Option<String>,

    #[serde(deserialize_with = "form_string")]
    pub passport_number: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "2030-01-31")]
    pub passport_expiry: Option<String>,

    #[serde(deserialize_with = "form_string")]
    #[schema(example = "2")]
    pub dependents: Option<String>,

    pub languages: Option<Vec<String>>,

    pub has_driving_license: Option<bool>,
}

/// Everything collected by the onboarding form. Lives only while the form is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub basic: BasicInfo,
    pub salary: SalaryStructure,
    pub personal: PersonalInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingStep {
    Basic,
    Salary,
    Personal,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 3] = [OnboardingStep::Basic, OnboardingStep::Salary, OnboardingStep::Personal];

    pub fn next(self) -> Option<OnboardingStep> {
        match self {
            OnboardingStep::Basic => Some(OnboardingStep::Salary),
            OnboardingStep::Salary => Some(OnboardingStep::Personal),
            OnboardingStep::Personal => None,
        }
    }
}

// --- HTTP payloads ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStepRequest {
    pub step: OnboardingStep,
    pub draft: EmployeeDraft,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepValidationResponse {
    pub step: OnboardingStep,
    pub valid: bool,
    pub next_step: Option<OnboardingStep>,
}

/// Which validator a single field check should run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldRule {
    Required,
    Name,
    Email,
    Phone,
    Password,
    Date {
        #[serde(default)]
        min: Option<String>,
        #[serde(default)]
        max: Option<String>,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Integer {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    DateOfBirth,
    JoiningDate {
        #[serde(rename = "dateOfBirth", default)]
        date_of_birth: Option<String>,
    },
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheckRequest {
    pub rule: FieldRule,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
}
