// src/common/validation.rs

// Form field validators. Every validator is total: it returns a
// `FieldValidation` instead of failing, and the caller decides how to surface it.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidateEmail;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MINIMUM_EMPLOYEE_AGE: i32 = 18;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]{2,50}$").expect("valid name pattern"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d+$").expect("valid phone pattern"));
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl FieldValidation {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(message.into()) }
    }
}

/// Shared first step of every validator.
/// `Some(result)` means the value was blank and the outcome is already decided.
fn check_required(value: &str, required: bool) -> Option<FieldValidation> {
    if !value.trim().is_empty() {
        return None;
    }
    if required {
        Some(FieldValidation::fail("This field is required"))
    } else {
        Some(FieldValidation::ok())
    }
}

pub fn validate_required(value: &str, required: bool) -> FieldValidation {
    check_required(value, required).unwrap_or_else(FieldValidation::ok)
}

pub fn validate_name(value: &str, required: bool) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    // Length applies to the raw input, padding included
    if !NAME_PATTERN.is_match(value) {
        return FieldValidation::fail("Name must contain only letters and spaces (2-50 characters)");
    }
    FieldValidation::ok()
}

pub fn validate_email(value: &str, required: bool) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    if !value.trim().to_string().validate_email() {
        return FieldValidation::fail("Please enter a valid email address");
    }
    FieldValidation::ok()
}

/// Digits with an optional leading `+`. Not a full E.164 check.
pub fn validate_phone_number(value: &str, required: bool) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    if !PHONE_PATTERN.is_match(value.trim()) {
        return FieldValidation::fail("Phone number must contain only digits and an optional leading +");
    }
    FieldValidation::ok()
}

/// Parses a `YYYY-MM-DD` value into a real calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !DATE_PATTERN.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn validate_date(
    value: &str,
    required: bool,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    if !DATE_PATTERN.is_match(value.trim()) {
        return FieldValidation::fail("Date must be in YYYY-MM-DD format");
    }
    let Some(date) = parse_date(value) else {
        return FieldValidation::fail("Please enter a valid date");
    };
    if let Some(min) = min {
        if date < min {
            return FieldValidation::fail(format!("Date must be on or after {}", min.format(DATE_FORMAT)));
        }
    }
    if let Some(max) = max {
        if date > max {
            return FieldValidation::fail(format!("Date must be on or before {}", max.format(DATE_FORMAT)));
        }
    }
    FieldValidation::ok()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn check_bounds(number: f64, min: Option<f64>, max: Option<f64>) -> Option<FieldValidation> {
    if let Some(min) = min {
        if number < min {
            return Some(FieldValidation::fail(format!("Value must be at least {}", min)));
        }
    }
    if let Some(max) = max {
        if number > max {
            return Some(FieldValidation::fail(format!("Value must be at most {}", max)));
        }
    }
    None
}

pub fn validate_number(value: &str, required: bool, min: Option<f64>, max: Option<f64>) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    let Some(number) = parse_number(value) else {
        return FieldValidation::fail("Please enter a valid number");
    };
    check_bounds(number, min, max).unwrap_or_else(FieldValidation::ok)
}

pub fn validate_integer(value: &str, required: bool, min: Option<f64>, max: Option<f64>) -> FieldValidation {
    if let Some(result) = check_required(value, required) {
        return result;
    }
    let Some(number) = parse_number(value) else {
        return FieldValidation::fail("Please enter a valid number");
    };
    if number.fract() != 0.0 {
        return FieldValidation::fail("Please enter a whole number");
    }
    check_bounds(number, min, max).unwrap_or_else(FieldValidation::ok)
}

pub fn validate_password(value: &str) -> FieldValidation {
    if value.is_empty() {
        return FieldValidation::fail("This field is required");
    }
    if value.chars().count() < 8 {
        return FieldValidation::fail("Password must be at least 8 characters long");
    }
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return FieldValidation::fail(
            "Password must contain at least one uppercase letter, one lowercase letter and one number",
        );
    }
    FieldValidation::ok()
}

/// Whole years between `birth` and `today`.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Date of birth: a valid past date for someone at least 18 years old.
pub fn validate_date_of_birth(value: &str, required: bool, today: NaiveDate) -> FieldValidation {
    let shape = validate_date(value, required, None, Some(today));
    if !shape.is_valid {
        return shape;
    }
    let Some(birth) = parse_date(value) else {
        return shape;
    };
    if calculate_age(birth, today) < MINIMUM_EMPLOYEE_AGE {
        return FieldValidation::fail(format!(
            "Employee must be at least {} years old",
            MINIMUM_EMPLOYEE_AGE
        ));
    }
    FieldValidation::ok()
}

/// Joining date: a valid date strictly after the date of birth (when known).
pub fn validate_joining_date(value: &str, required: bool, date_of_birth: Option<NaiveDate>) -> FieldValidation {
    let shape = validate_date(value, required, None, None);
    if !shape.is_valid {
        return shape;
    }
    let (Some(joining), Some(birth)) = (parse_date(value), date_of_birth) else {
        return shape;
    };
    if joining <= birth {
        return FieldValidation::fail("Joining date must be after date of birth");
    }
    FieldValidation::ok()
}
