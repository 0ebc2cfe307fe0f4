// src/services/employee_service.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::{Map, Number, Value};

use crate::{
    common::{
        error::AppError,
        validation::{self, FieldValidation},
    },
    models::{
        employee::{BasicInfo, EmployeeDraft, FieldCheckRequest, FieldRule, OnboardingStep, PersonalInfo},
        salary::SalaryStructure,
    },
    services::salary_service,
};

pub const MAX_PROBATION_MONTHS: f64 = 12.0;
pub const MAX_DEPENDENTS: f64 = 20.0;

#[derive(Clone)]
pub struct EmployeeService {
    currency: String,
}

impl EmployeeService {
    pub fn new(currency: impl Into<String>) -> Self {
        Self { currency: currency.into() }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    // =========================================================================
    //  STEP VALIDATION
    // =========================================================================

    /// Gate for leaving `step`. Field steps report every failing field at once;
    /// the salary step reports the reconciliation error.
    pub fn validate_step(&self, draft: &EmployeeDraft, step: OnboardingStep, today: NaiveDate) -> Result<(), AppError> {
        let errors = match step {
            OnboardingStep::Basic => validate_basic(&draft.basic, today),
            OnboardingStep::Salary => return salary_service::validate_allocation(&draft.salary, &self.currency),
            OnboardingStep::Personal => validate_personal(&draft.personal, today),
        };

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?step, fields = errors.len(), "Onboarding step rejected");
            Err(AppError::FieldErrors(errors))
        }
    }

    /// Runs every step in order and stops at the first one that fails.
    pub fn validate_all(&self, draft: &EmployeeDraft, today: NaiveDate) -> Result<(), AppError> {
        OnboardingStep::ALL
            .iter()
            .try_for_each(|step| self.validate_step(draft, *step, today))
    }

    /// Validated, normalized payload for the employee API.
    pub fn prepare_submission(&self, draft: &EmployeeDraft, today: NaiveDate) -> Result<Map<String, Value>, AppError> {
        self.validate_all(draft, today)?;
        build_submission(draft)
    }
}

fn record(errors: &mut BTreeMap<String, String>, field: &str, result: FieldValidation) {
    if result.is_valid {
        return;
    }
    let message = result.error.unwrap_or_else(|| "Invalid value".to_string());
    errors.insert(field.to_string(), message);
}

fn value(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

fn validate_basic(basic: &BasicInfo, today: NaiveDate) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    record(&mut errors, "employeeCode", validation::validate_required(value(&basic.employee_code), true));
    record(&mut errors, "firstName", validation::validate_name(value(&basic.first_name), true));
    record(&mut errors, "lastName", validation::validate_name(value(&basic.last_name), true));
    record(&mut errors, "email", validation::validate_email(value(&basic.email), true));
    record(&mut errors, "phone", validation::validate_phone_number(value(&basic.phone), true));
    record(
        &mut errors,
        "dateOfBirth",
        validation::validate_date_of_birth(value(&basic.date_of_birth), true, today),
    );

    let birth = validation::parse_date(value(&basic.date_of_birth));
    record(
        &mut errors,
        "joiningDate",
        validation::validate_joining_date(value(&basic.joining_date), true, birth),
    );
    record(&mut errors, "department", validation::validate_required(value(&basic.department), true));
    record(&mut errors, "designation", validation::validate_required(value(&basic.designation), true));
    record(
        &mut errors,
        "probationMonths",
        validation::validate_integer(value(&basic.probation_months), false, Some(0.0), Some(MAX_PROBATION_MONTHS)),
    );

    errors
}

fn validate_personal(personal: &PersonalInfo, today: NaiveDate) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    record(&mut errors, "gender", validation::validate_required(value(&personal.gender), true));
    record(&mut errors, "nationality", validation::validate_required(value(&personal.nationality), true));
    record(
        &mut errors,
        "emergencyContactName",
        validation::validate_name(value(&personal.emergency_contact_name), false),
    );
    record(
        &mut errors,
        "emergencyContactPhone",
        validation::validate_phone_number(value(&personal.emergency_contact_phone), false),
    );
    // Expiry must not be in the past
    record(
        &mut errors,
        "passportExpiry",
        validation::validate_date(value(&personal.passport_expiry), false, Some(today), None),
    );
    record(
        &mut errors,
        "dependents",
        validation::validate_integer(value(&personal.dependents), false, Some(0.0), Some(MAX_DEPENDENTS)),
    );

    errors
}

// =========================================================================
//  SINGLE FIELD CHECKS (on change / blur)
// =========================================================================

pub fn check_field(request: &FieldCheckRequest, today: NaiveDate) -> FieldValidation {
    let value = request.value.as_str();
    let required = request.required;

    match &request.rule {
        FieldRule::Required => validation::validate_required(value, required),
        FieldRule::Name => validation::validate_name(value, required),
        FieldRule::Email => validation::validate_email(value, required),
        FieldRule::Phone => validation::validate_phone_number(value, required),
        FieldRule::Password => validation::validate_password(value),
        FieldRule::Date { min, max } => {
            let min = min.as_deref().and_then(validation::parse_date);
            let max = max.as_deref().and_then(validation::parse_date);
            validation::validate_date(value, required, min, max)
        }
        FieldRule::Number { min, max } => validation::validate_number(value, required, *min, *max),
        FieldRule::Integer { min, max } => validation::validate_integer(value, required, *min, *max),
        FieldRule::DateOfBirth => validation::validate_date_of_birth(value, required, today),
        FieldRule::JoiningDate { date_of_birth } => {
            let birth = date_of_birth.as_deref().and_then(validation::parse_date);
            validation::validate_joining_date(value, required, birth)
        }
    }
}

// =========================================================================
//  SUBMISSION PAYLOAD
// =========================================================================

// Empty fields are sent as their type's zero value, never omitted.

fn text(field: &Option<String>) -> Value {
    Value::String(field.as_deref().map(str::trim).unwrap_or_default().to_string())
}

fn integer(field: &Option<String>) -> Value {
    let parsed = field
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0);
    Value::from(parsed)
}

fn number(value: Decimal) -> Value {
    value
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

fn flag(field: Option<bool>) -> Value {
    Value::Bool(field.unwrap_or(false))
}

fn list(field: &Option<Vec<String>>) -> Value {
    Value::Array(
        field
            .iter()
            .flatten()
            .map(|item| Value::String(item.clone()))
            .collect(),
    )
}

/// `house_rent` -> `houseRent`
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn insert_salary(payload: &mut Map<String, Value>, salary: &SalaryStructure) -> Result<(), AppError> {
    payload.insert("monthlySalary".into(), number(salary.monthly_salary));
    payload.insert("basicSalary".into(), number(salary.basic));
    payload.insert("basicPercentage".into(), number(salary.basic_percentage));

    let mut custom = Vec::new();
    for component in &salary.components {
        // Hidden allowances do not count and are sent as zero
        let (amount, percentage) = if component.visible {
            (component.amount, component.percentage)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        if component.custom {
            if component.visible {
                let mut entry = Map::new();
                entry.insert("label".into(), Value::String(component.label.clone()));
                entry.insert("amount".into(), number(amount));
                entry.insert("percentage".into(), number(percentage));
                custom.push(Value::Object(entry));
            }
            continue;
        }

        let name = camel_case(&component.key);
        payload.insert(format!("{}Allowance", name), number(amount));
        payload.insert(format!("{}Percentage", name), number(percentage));
    }
    payload.insert("customAllowances".into(), Value::Array(custom));
    payload.insert("totalSalary".into(), number(salary_service::calculate_total(salary)?));
    Ok(())
}

/// Flattens basic, salary and personal sections into one object.
pub fn build_submission(draft: &EmployeeDraft) -> Result<Map<String, Value>, AppError> {
    let basic = &draft.basic;
    let personal = &draft.personal;
    let mut payload = Map::new();

    payload.insert("employeeCode".into(), text(&basic.employee_code));
    payload.insert("firstName".into(), text(&basic.first_name));
    payload.insert("lastName".into(), text(&basic.last_name));
    payload.insert("email".into(), text(&basic.email));
    payload.insert("phone".into(), text(&basic.phone));
    payload.insert("dateOfBirth".into(), text(&basic.date_of_birth));
    payload.insert("joiningDate".into(), text(&basic.joining_date));
    payload.insert("department".into(), text(&basic.department));
    payload.insert("designation".into(), text(&basic.designation));
    payload.insert("probationMonths".into(), integer(&basic.probation_months));

    insert_salary(&mut payload, &draft.salary)?;

    payload.insert("gender".into(), text(&personal.gender));
    payload.insert("maritalStatus".into(), text(&personal.marital_status));
    payload.insert("nationality".into(), text(&personal.nationality));
    payload.insert("address".into(), text(&personal.address));
    payload.insert("emergencyContactName".into(), text(&personal.emergency_contact_name));
    payload.insert("emergencyContactPhone".into(), text(&personal.emergency_contact_phone));
    payload.insert("passportNumber".into(), text(&personal.passport_number));
    payload.insert("passportExpiry".into(), text(&personal.passport_expiry));
    payload.insert("dependents".into(), integer(&personal.dependents));
    payload.insert("languages".into(), list(&personal.languages));
    payload.insert("hasDrivingLicense".into(), flag(personal.has_driving_license));

    Ok(payload)
}
