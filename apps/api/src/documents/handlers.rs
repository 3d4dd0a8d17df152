use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::CurrentSession;
use crate::documents::diet_chart::{build_diet_chart, ChartHeader, DietChart, DietEdit};
use crate::documents::{attachment, generate_blocking};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// The session's draft for this patient, or a fresh chart seeded from the
/// patient record.
async fn current_draft(
    state: &AppState,
    session: &CurrentSession,
    patient_id: &str,
) -> Result<DietChart, AppError> {
    let patient = state.directory.patient(patient_id).await?;
    let draft = state
        .sessions
        .with_session(session.token, |s| s.diet_chart_drafts.get(patient_id).cloned())
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(draft.unwrap_or_else(|| {
        DietChart::for_patient(&patient.constitution, &patient.dietary_restrictions)
    }))
}

/// GET /api/v1/patients/:id/diet-chart
pub async fn handle_get_draft(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(patient_id): Path<String>,
) -> Result<Json<DietChart>, AppError> {
    session.require(Role::Doctor)?;
    Ok(Json(current_draft(&state, &session, &patient_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct EditBatch {
    pub edits: Vec<DietEdit>,
}

/// POST /api/v1/patients/:id/diet-chart/edits
///
/// Applies the whole batch or nothing.
pub async fn handle_apply_edits(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(patient_id): Path<String>,
    Json(batch): Json<EditBatch>,
) -> Result<Json<DietChart>, AppError> {
    session.require(Role::Doctor)?;
    let draft = current_draft(&state, &session, &patient_id).await?;

    let updated = draft.apply_all(&batch.edits).map_err(|e| {
        warn!(patient = %patient_id, "diet chart edit rejected: {e}");
        AppError::from(e)
    })?;

    state
        .sessions
        .with_session(session.token, |s| {
            s.diet_chart_drafts.insert(patient_id.clone(), updated.clone())
        })
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(updated))
}

/// POST /api/v1/patients/:id/diet-chart/pdf
pub async fn handle_render_chart(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(patient_id): Path<String>,
) -> Result<Response, AppError> {
    session.require(Role::Doctor)?;
    let patient = state.directory.patient(&patient_id).await?;
    let chart = current_draft(&state, &session, &patient_id).await?;

    let header = ChartHeader {
        patient_name: patient.name,
        patient_age: patient.age,
        prepared_by: session.user.name.clone(),
        date: Utc::now().date_naive(),
    };
    let config = state.page_config;
    let artifact = generate_blocking(move || build_diet_chart(config, &header, &chart)).await?;

    info!(
        patient = %patient_id,
        filename = %artifact.filename,
        pages = artifact.page_count,
        "diet chart generated"
    );
    Ok(attachment(artifact))
}
