use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, FieldError};
use crate::registration::models::Registration;
use crate::registration::store::RegisteredAccount;
use crate::registration::validation::{validate_step, LAST_STEP};
use crate::state::AppState;

/// POST /api/v1/registrations
pub async fn handle_register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<RegisteredAccount>), AppError> {
    let record = state.registry.register(&registration).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct StepCheck {
    pub step: u8,
    pub registration: Registration,
}

#[derive(Debug, Serialize)]
pub struct StepResult {
    pub step: u8,
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

/// POST /api/v1/registrations/validate-step
///
/// Checks one wizard step. Field errors are data here, not a failed request.
pub async fn handle_validate_step(Json(check): Json<StepCheck>) -> Result<Json<StepResult>, AppError> {
    if check.step > LAST_STEP {
        return Err(AppError::Validation(format!(
            "step must be between 0 and {LAST_STEP}"
        )));
    }
    let errors = validate_step(&check.registration, check.step);
    Ok(Json(StepResult {
        step: check.step,
        valid: errors.is_empty(),
        errors,
    }))
}
