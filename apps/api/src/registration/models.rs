use serde::Deserialize;

use crate::models::form::string_or_number;
use crate::models::user::Role;

/// Fields every account has, whatever the role.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountDetails {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    pub gender: String,
    pub location: String,
}

/// What the client declares about an uploaded report. The file itself is
/// never sent here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientRegistration {
    #[serde(flatten)]
    pub account: AccountDetails,
    pub height: String,
    pub weight: String,
    pub medical_report: Option<ReportMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DoctorRegistration {
    #[serde(flatten)]
    pub account: AccountDetails,
    pub doc_id_type: String,
    pub doc_id: String,
}

/// A sign-up form, tagged by the role being registered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Registration {
    Patient(PatientRegistration),
    Doctor(DoctorRegistration),
}

impl Registration {
    pub fn role(&self) -> Role {
        match self {
            Registration::Patient(_) => Role::Patient,
            Registration::Doctor(_) => Role::Doctor,
        }
    }

    pub fn account(&self) -> &AccountDetails {
        match self {
            Registration::Patient(p) => &p.account,
            Registration::Doctor(d) => &d.account,
        }
    }
}
