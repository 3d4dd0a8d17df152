//! Sign-up validation.
//!
//! The wizard validates one step at a time; submission validates all steps.
//! Each field reports at most one error, the first rule it breaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::FieldError;
use crate::models::form::coerce_number;
use crate::registration::models::{AccountDetails, Registration, ReportMetadata};

pub const LAST_STEP: u8 = 2;
pub const MAX_REPORT_BYTES: u64 = 5 * 1024 * 1024;
const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_AGE: u32 = 150;
const GENDERS: [&str; 3] = ["male", "female", "other"];
const REPORT_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex is valid"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,12}$").expect("static regex is valid"));
static LEADING_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d").expect("static regex is valid"));

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Every error in the form.
pub fn validate_registration(registration: &Registration) -> Vec<FieldError> {
    (0..=LAST_STEP)
        .flat_map(|step| validate_step(registration, step))
        .collect()
}

/// Errors for the fields of one wizard step: 0 account, 1 personal details,
/// 2 role documents. Steps past the last have no fields.
pub fn validate_step(registration: &Registration, step: u8) -> Vec<FieldError> {
    let account = registration.account();
    let mut errors = Vec::new();

    match (step, registration) {
        (0, _) => account_step(account, &mut errors),
        (1, reg) => {
            personal_step(account, &mut errors);
            if let Registration::Patient(p) = reg {
                measurement(
                    &p.height,
                    "height",
                    "Height is required",
                    "Enter valid height (e.g., 5'8\")",
                    &mut errors,
                );
                measurement(
                    &p.weight,
                    "weight",
                    "Weight is required",
                    "Enter valid weight (e.g., 70 kg)",
                    &mut errors,
                );
            }
        }
        (2, Registration::Patient(p)) => report(p.medical_report.as_ref(), &mut errors),
        (2, Registration::Doctor(d)) => {
            if blank(&d.doc_id_type) {
                errors.push(FieldError::new("doc_id_type", "ID type is required"));
            }
            if blank(&d.doc_id) {
                errors.push(FieldError::new("doc_id", "ID number is required"));
            }
        }
        _ => {}
    }
    errors
}

fn account_step(account: &AccountDetails, errors: &mut Vec<FieldError>) {
    if blank(&account.name) {
        errors.push(FieldError::new("name", "Name is required"));
    }

    if blank(&account.email) {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EMAIL.is_match(account.email.trim()) {
        errors.push(FieldError::new("email", "Invalid email"));
    }

    if blank(&account.phone_number) {
        errors.push(FieldError::new("phone_number", "Phone number is required"));
    } else if !PHONE.is_match(account.phone_number.trim()) {
        errors.push(FieldError::new(
            "phone_number",
            "Enter a valid phone number (10-12 digits)",
        ));
    }

    if account.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if account.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new("password", "Min 6 characters"));
    }

    if account.confirm_password.is_empty() {
        errors.push(FieldError::new("confirm_password", "Confirm Password is required"));
    } else if account.confirm_password != account.password {
        errors.push(FieldError::new("confirm_password", "Passwords must match"));
    }
}

/// The age a valid registration carries: a whole number in `1..=MAX_AGE`.
pub fn parse_age(raw: &str) -> Option<u32> {
    let age = coerce_number(raw);
    (age > 0.0 && age.fract() == 0.0 && age <= f64::from(MAX_AGE)).then_some(age as u32)
}

fn personal_step(account: &AccountDetails, errors: &mut Vec<FieldError>) {
    if blank(&account.age) {
        errors.push(FieldError::new("age", "Age is required"));
    } else {
        let age = coerce_number(&account.age);
        if age.is_nan() {
            errors.push(FieldError::new("age", "Age must be a number"));
        } else if age <= 0.0 {
            errors.push(FieldError::new("age", "Age must be positive"));
        } else if age.fract() != 0.0 {
            errors.push(FieldError::new("age", "Age must be an integer"));
        } else if age > f64::from(MAX_AGE) {
            errors.push(FieldError::new("age", "Enter a valid age"));
        }
    }

    if blank(&account.gender) {
        errors.push(FieldError::new("gender", "Gender is required"));
    } else if !GENDERS.contains(&account.gender.trim()) {
        errors.push(FieldError::new("gender", "Select a valid gender"));
    }

    if blank(&account.location) {
        errors.push(FieldError::new("location", "Location is required"));
    }
}

fn measurement(
    value: &str,
    field: &'static str,
    required: &str,
    malformed: &str,
    errors: &mut Vec<FieldError>,
) {
    if blank(value) {
        errors.push(FieldError::new(field, required));
    } else if !LEADING_DIGIT.is_match(value.trim()) {
        errors.push(FieldError::new(field, malformed));
    }
}

fn report(report: Option<&ReportMetadata>, errors: &mut Vec<FieldError>) {
    let Some(report) = report.filter(|r| !blank(&r.file_name)) else {
        errors.push(FieldError::new("medical_report", "Medical report is required"));
        return;
    };
    if report.size_bytes > MAX_REPORT_BYTES {
        errors.push(FieldError::new("medical_report", "File size too large (max 5MB)"));
    } else if !REPORT_TYPES.contains(&report.content_type.as_str()) {
        errors.push(FieldError::new("medical_report", "Unsupported file type"));
    }
}
