//! Editable profile of the signed-in user.

use serde::{Deserialize, Serialize};

use crate::errors::FieldError;
use crate::models::user::{Role, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<u32>,
    pub gender: String,
    pub medical_history: String,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub license: String,
    /// Years of practice.
    pub experience: Option<u32>,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Patient(PatientProfile),
    Doctor(DoctorProfile),
}

impl Profile {
    /// A profile seeded with the user's name and e-mail.
    pub fn for_user(user: &User) -> Self {
        match user.role {
            Role::Patient => Profile::Patient(PatientProfile {
                full_name: user.name.clone(),
                email: user.email.clone(),
                ..Default::default()
            }),
            Role::Doctor => Profile::Doctor(DoctorProfile {
                full_name: user.name.clone(),
                email: user.email.clone(),
                ..Default::default()
            }),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Patient(_) => Role::Patient,
            Profile::Doctor(_) => Role::Doctor,
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let (full_name, email) = match self {
            Profile::Patient(p) => (&p.full_name, &p.email),
            Profile::Doctor(d) => (&d.full_name, &d.email),
        };
        let mut errors = Vec::new();
        if full_name.trim().is_empty() {
            errors.push(FieldError::new("full_name", "Full name is required"));
        }
        if email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        }
        errors
    }
}
