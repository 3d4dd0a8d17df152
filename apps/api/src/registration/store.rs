use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::{AppError, FieldError};
use crate::models::user::Role;
use crate::registration::models::Registration;
use crate::registration::validation::{parse_age, validate_registration};

/// What is kept of a registration. Passwords and report contents are not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredAccount {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub age: u32,
    pub gender: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredAccount {
    /// Assumes `registration` already passed validation.
    fn from_registration(registration: &Registration) -> Self {
        let account = registration.account();
        let mut record = Self {
            role: registration.role(),
            name: account.name.trim().to_string(),
            email: normalize_email(&account.email),
            phone_number: account.phone_number.trim().to_string(),
            age: parse_age(&account.age).unwrap_or(0),
            gender: account.gender.trim().to_string(),
            location: account.location.trim().to_string(),
            height: None,
            weight: None,
            report_file_name: None,
            doc_id_type: None,
            doc_id: None,
            registered_at: Utc::now(),
        };
        match registration {
            Registration::Patient(p) => {
                record.height = Some(p.height.trim().to_string());
                record.weight = Some(p.weight.trim().to_string());
                record.report_file_name = p.medical_report.as_ref().map(|r| r.file_name.clone());
            }
            Registration::Doctor(d) => {
                record.doc_id_type = Some(d.doc_id_type.trim().to_string());
                record.doc_id = Some(d.doc_id.trim().to_string());
            }
        }
        record
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("registration has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("Email or phone number is already registered!")]
    Duplicate,
}

impl From<RegistrationError> for AppError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::Invalid(fields) => AppError::InvalidFields(fields),
            RegistrationError::Duplicate => {
                AppError::Conflict(RegistrationError::Duplicate.to_string())
            }
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registered accounts keyed by e-mail.
#[derive(Clone, Default)]
pub struct RegistrationStore {
    inner: Arc<RwLock<HashMap<String, RegisteredAccount>>>,
}

impl RegistrationStore {
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisteredAccount, RegistrationError> {
        let errors = validate_registration(registration);
        if !errors.is_empty() {
            return Err(RegistrationError::Invalid(errors));
        }

        let record = RegisteredAccount::from_registration(registration);
        let mut accounts = self.inner.write().await;
        let taken = accounts.contains_key(&record.email)
            || accounts
                .values()
                .any(|a| a.phone_number == record.phone_number);
        if taken {
            return Err(RegistrationError::Duplicate);
        }

        accounts.insert(record.email.clone(), record.clone());
        info!(email = %record.email, role = record.role.as_str(), "account registered");
        Ok(record)
    }

    #[cfg(test)]
    pub async fn find(&self, email: &str) -> Option<RegisteredAccount> {
        self.inner.read().await.get(&normalize_email(email)).cloned()
    }
}
