use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentSession;
use crate::documents::health_summary::build_health_summary;
use crate::documents::{attachment, generate_blocking};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;
use crate::tracker::scoring::{calculate_score, HealthReading, HealthScore};

/// GET /api/v1/tracker/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, AppError> {
    session.require(Role::Patient)?;
    let entries = state
        .sessions
        .with_session(session.token, |s| {
            (!s.health_log.is_empty()).then(|| s.health_log.entries().to_vec())
        })
        .await
        .ok_or(AppError::Unauthorized)?;
    let Some(entries) = entries else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    Ok(Json(entries).into_response())
}

/// POST /api/v1/tracker/entries
///
/// 201 with the new entry, or 204 when every field was blank.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(reading): Json<HealthReading>,
) -> Result<Response, AppError> {
    session.require(Role::Patient)?;
    let today = Utc::now().date_naive();
    let entry = state
        .sessions
        .with_session(session.token, |s| s.health_log.add(reading, today).cloned())
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(match entry {
        Some(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// DELETE /api/v1/tracker/entries/:id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session.require(Role::Patient)?;
    let removed = state
        .sessions
        .with_session(session.token, |s| s.health_log.remove(id))
        .await
        .ok_or(AppError::Unauthorized)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Entry {id}")))
    }
}

/// POST /api/v1/tracker/score
///
/// Scores a reading without recording it.
pub async fn handle_score(
    _session: CurrentSession,
    Json(reading): Json<HealthReading>,
) -> Json<HealthScore> {
    Json(calculate_score(&reading))
}

/// GET /api/v1/tracker/summary.pdf
///
/// 204 when the log is empty.
pub async fn handle_summary(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, AppError> {
    session.require(Role::Patient)?;
    let entries = state
        .sessions
        .with_session(session.token, |s| s.health_log.entries().to_vec())
        .await
        .ok_or(AppError::Unauthorized)?;

    let config = state.page_config;
    let artifact = generate_blocking(move || build_health_summary(config, &entries)).await?;
    Ok(match artifact {
        Some(artifact) => {
            info!(
                user = %session.user.email,
                pages = artifact.page_count,
                "health summary generated"
            );
            attachment(artifact)
        }
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
