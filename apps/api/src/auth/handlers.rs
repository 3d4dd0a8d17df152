use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authenticate, CurrentSession};
use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

/// Any `password` sent along is ignored; the demo accounts accept anything.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: User,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(req.email.trim(), req.role).ok_or(AppError::InvalidCredentials)?;
    let token = state.sessions.create(user.clone()).await;
    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> StatusCode {
    state.sessions.end(session.token).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn handle_me(session: CurrentSession) -> Json<User> {
    Json(session.user)
}
