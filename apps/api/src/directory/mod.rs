//! Patients and consultation requests shown on the dashboards.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

pub mod handlers;
pub mod models;
pub mod profile;

use models::{
    age_on, seed_patients, seed_requests, ConsultationRequest, NewRequest, Patient, RequestStatus,
};

/// Shared, seeded directory. Clones share the same data.
#[derive(Clone)]
pub struct Directory {
    patients: Arc<RwLock<Vec<Patient>>>,
    requests: Arc<RwLock<Vec<ConsultationRequest>>>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            patients: Arc::new(RwLock::new(seed_patients())),
            requests: Arc::new(RwLock::new(seed_requests())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RequestCounts {
    pub pending: usize,
    pub in_review: usize,
    pub completed: usize,
}

impl Directory {
    pub async fn patients(&self) -> Vec<Patient> {
        self.patients.read().await.clone()
    }

    pub async fn patient(&self, id: &str) -> Result<Patient, AppError> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Patient {id}")))
    }

    /// Replaces the stored patient, keeping its id and recomputing its age.
    pub async fn update_patient(
        &self,
        id: &str,
        mut updated: Patient,
        today: NaiveDate,
    ) -> Result<Patient, AppError> {
        if updated.name.trim().is_empty() {
            return Err(AppError::Validation("Patient name is required".into()));
        }
        updated.id = id.to_string();
        updated.age = age_on(updated.date_of_birth, today);

        let mut patients = self.patients.write().await;
        let slot = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Patient {id}")))?;
        *slot = updated.clone();
        info!(patient = %id, "patient record updated");
        Ok(updated)
    }

    pub async fn requests(&self) -> Vec<ConsultationRequest> {
        self.requests.read().await.clone()
    }

    pub async fn requests_for(&self, patient_id: &str) -> Vec<ConsultationRequest> {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// Files a pending request for the patient record `patient_id`, newest
    /// first. The request carries the name on that record.
    pub async fn create_request(
        &self,
        patient_id: &str,
        new: NewRequest,
        today: NaiveDate,
    ) -> Result<ConsultationRequest, AppError> {
        if new.title.trim().is_empty() {
            return Err(AppError::Validation("Request title is required".into()));
        }
        let patient = self.patient(patient_id).await?;
        let request = ConsultationRequest {
            id: Uuid::new_v4().to_string(),
            patient_id: patient.id.clone(),
            patient_name: patient.name,
            title: new.title.trim().to_string(),
            description: new.description,
            health_goals: new.health_goals,
            current_symptoms: new.current_symptoms,
            status: RequestStatus::Pending,
            created_at: today,
            assigned_doctor_id: None,
            response: None,
        };
        self.requests.write().await.insert(0, request.clone());
        info!(request = %request.id, patient = %patient.id, "consultation request created");
        Ok(request)
    }

    pub async fn set_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<ConsultationRequest, AppError> {
        self.modify_request(id, |r| r.status = status).await
    }

    /// Stores a doctor's response and completes the request. A blank
    /// response is rejected and changes nothing.
    pub async fn respond(
        &self,
        id: &str,
        doctor: &User,
        response: &str,
    ) -> Result<ConsultationRequest, AppError> {
        let response = response.trim();
        if response.is_empty() {
            return Err(AppError::Validation("Response must not be empty".into()));
        }
        self.modify_request(id, |r| {
            r.response = Some(response.to_string());
            r.status = RequestStatus::Completed;
            r.assigned_doctor_id = Some(doctor.id.clone());
        })
        .await
    }

    pub async fn request_counts(&self) -> RequestCounts {
        self.requests
            .read()
            .await
            .iter()
            .fold(RequestCounts::default(), |mut counts, r| {
                match r.status {
                    RequestStatus::Pending => counts.pending += 1,
                    RequestStatus::InReview => counts.in_review += 1,
                    RequestStatus::Completed => counts.completed += 1,
                }
                counts
            })
    }

    async fn modify_request(
        &self,
        id: &str,
        f: impl FnOnce(&mut ConsultationRequest),
    ) -> Result<ConsultationRequest, AppError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Request {id}")))?;
        f(request);
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::mock_users;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_counts() {
        let dir = Directory::default();
        assert_eq!(dir.patients().await.len(), 4);
        let counts = dir.request_counts().await;
        assert_eq!(
            counts,
            RequestCounts {
                pending: 1,
                in_review: 1,
                completed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_update_recomputes_age() {
        let dir = Directory::default();
        let mut priya = dir.patient("1").await.unwrap();
        priya.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        priya.age = 99;
        priya.id = "ignored".into();

        let saved = dir.update_patient("1", priya, today()).await.unwrap();
        assert_eq!(saved.age, 24);
        assert_eq!(saved.id, "1");
        assert_eq!(dir.patient("1").await.unwrap().age, 24);
    }

    #[tokio::test]
    async fn test_update_unknown_patient() {
        let dir = Directory::default();
        let patient = dir.patient("2").await.unwrap();
        let err = dir.update_patient("42", patient, today()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_respond_completes_request() {
        let dir = Directory::default();
        let doctor = mock_users()[1].clone();
        let done = dir.respond("2", &doctor, "  Eat warm food.  ").await.unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(done.response.as_deref(), Some("Eat warm food."));
        assert_eq!(done.assigned_doctor_id.as_deref(), Some("doc-1"));
        assert_eq!(dir.request_counts().await.pending, 0);
    }

    #[tokio::test]
    async fn test_blank_response_changes_nothing() {
        let dir = Directory::default();
        let doctor = mock_users()[1].clone();
        assert!(dir.respond("2", &doctor, "   ").await.is_err());
        assert_eq!(dir.request_counts().await.pending, 1);
    }

    #[tokio::test]
    async fn test_new_request_is_pending_and_listed_first() {
        let dir = Directory::default();
        let patient = mock_users()[0].clone();
        let created = dir
            .create_request(
                &patient.id,
                NewRequest {
                    title: "Sleep support".into(),
                    ..Default::default()
                },
                today(),
            )
            .await
            .unwrap();
        assert_eq!(created.status, RequestStatus::Pending);
        assert_eq!(created.created_at, today());
        assert_eq!(created.patient_name, dir.patient(&created.patient_id).await.unwrap().name);

        let mine = dir.requests_for(&patient.id).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, created.id);
        assert_eq!(dir.requests().await.len(), 4);
    }

    #[tokio::test]
    async fn test_request_for_unknown_patient_is_rejected() {
        let dir = Directory::default();
        let new = NewRequest {
            title: "Sleep support".into(),
            ..Default::default()
        };
        let err = dir.create_request("404", new, today()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(dir.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_set_status() {
        let dir = Directory::default();
        let r = dir.set_status("3", RequestStatus::Completed).await.unwrap();
        assert_eq!(r.status, RequestStatus::Completed);
        assert!(dir.set_status("nope", RequestStatus::Pending).await.is_err());
    }
}
