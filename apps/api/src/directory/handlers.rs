use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentSession;
use crate::directory::models::{ConsultationRequest, NewRequest, Patient, RequestStatus};
use crate::directory::profile::Profile;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;
use crate::tracker::scoring::ImprovementLabel;

// ────────────────────────────────────────────────────────────────────────────
// Patients
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/patients
pub async fn handle_list_patients(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<Patient>>, AppError> {
    session.require(Role::Doctor)?;
    Ok(Json(state.directory.patients().await))
}

/// GET /api/v1/patients/:id
pub async fn handle_get_patient(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Patient>, AppError> {
    session.require(Role::Doctor)?;
    Ok(Json(state.directory.patient(&id).await?))
}

/// PUT /api/v1/patients/:id
pub async fn handle_update_patient(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Json(patient): Json<Patient>,
) -> Result<Json<Patient>, AppError> {
    session.require(Role::Doctor)?;
    let today = Utc::now().date_naive();
    Ok(Json(state.directory.update_patient(&id, patient, today).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Consultation requests
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/requests
///
/// Doctors see every request; patients see their own.
pub async fn handle_list_requests(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Json<Vec<ConsultationRequest>> {
    let requests = match session.user.role {
        Role::Doctor => state.directory.requests().await,
        Role::Patient => state.directory.requests_for(&session.user.id).await,
    };
    Json(requests)
}

/// POST /api/v1/requests
pub async fn handle_create_request(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(new): Json<NewRequest>,
) -> Result<(StatusCode, Json<ConsultationRequest>), AppError> {
    session.require(Role::Patient)?;
    let today = Utc::now().date_naive();
    let request = state
        .directory
        .create_request(&session.user.id, new, today)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

/// PATCH /api/v1/requests/:id/status
pub async fn handle_set_status(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ConsultationRequest>, AppError> {
    session.require(Role::Doctor)?;
    Ok(Json(state.directory.set_status(&id, update.status).await?))
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    pub response: String,
}

/// POST /api/v1/requests/:id/response
pub async fn handle_respond(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<ResponseBody>,
) -> Result<Json<ConsultationRequest>, AppError> {
    session.require(Role::Doctor)?;
    let request = state
        .directory
        .respond(&id, &session.user, &body.response)
        .await?;
    Ok(Json(request))
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Doctor {
        name: String,
        total_patients: usize,
        pending_requests: usize,
        in_review_requests: usize,
        completed_requests: usize,
    },
    Patient {
        name: String,
        open_requests: usize,
        health_log_entries: usize,
        latest_status: Option<ImprovementLabel>,
    },
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Dashboard>, AppError> {
    let name = session.user.name.clone();
    let dashboard = match session.user.role {
        Role::Doctor => {
            let counts = state.directory.request_counts().await;
            Dashboard::Doctor {
                name,
                total_patients: state.directory.patients().await.len(),
                pending_requests: counts.pending,
                in_review_requests: counts.in_review,
                completed_requests: counts.completed,
            }
        }
        Role::Patient => {
            let open_requests = state
                .directory
                .requests_for(&session.user.id)
                .await
                .iter()
                .filter(|r| r.status != RequestStatus::Completed)
                .count();
            let (entries, latest) = state
                .sessions
                .with_session(session.token, |s| {
                    (s.health_log.len(), s.health_log.latest().map(|e| e.improvements))
                })
                .await
                .ok_or(AppError::Unauthorized)?;
            Dashboard::Patient {
                name,
                open_requests,
                health_log_entries: entries,
                latest_status: latest,
            }
        }
    };
    Ok(Json(dashboard))
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .sessions
        .with_session(session.token, |s| s.profile.clone())
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, AppError> {
    if profile.role() != session.user.role {
        return Err(AppError::Validation(format!(
            "a {} cannot save a {} profile",
            session.user.role.as_str(),
            profile.role().as_str()
        )));
    }
    let errors = profile.validate();
    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }

    state
        .sessions
        .with_session(session.token, |s| s.profile = profile.clone())
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(profile))
}
