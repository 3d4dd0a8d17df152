//! Sign-in against the demo user directory and bearer-token sessions.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

pub mod handlers;
pub mod session;

pub use session::SessionStore;

/// The two demo accounts. Any password is accepted.
///
/// The patient account shares its id with a seeded directory record.
pub fn mock_users() -> Vec<User> {
    vec![
        User {
            id: "4".into(),
            email: "patient@demo.com".into(),
            name: "Mukesh".into(),
            role: Role::Patient,
            avatar: Some("https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?w=400".into()),
        },
        User {
            id: "doc-1".into(),
            email: "doctor@demo.com".into(),
            name: "Dr. Rajesh Kumar".into(),
            role: Role::Doctor,
            avatar: Some("https://images.pexels.com/photos/582750/pexels-photo-582750.jpeg?w=400".into()),
        },
    ]
}

/// Finds the demo user with exactly this e-mail and role.
pub fn authenticate(email: &str, role: Role) -> Option<User> {
    mock_users()
        .into_iter()
        .find(|u| u.email == email && u.role == role)
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

/// The caller's session, resolved from `Authorization: Bearer <token>`.
///
/// Rejects with 401 when the header is missing, malformed, or names a
/// session that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: Uuid,
    pub user: User,
}

impl CurrentSession {
    /// 403 unless the session user has `role`.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

pub fn bearer_token(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|t| Uuid::parse_str(t.trim()).ok())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let user = state
            .sessions
            .user(token)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(Self { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_authenticate_matches_email_and_role() {
        let user = authenticate("doctor@demo.com", Role::Doctor).unwrap();
        assert_eq!(user.name, "Dr. Rajesh Kumar");
        assert!(authenticate("doctor@demo.com", Role::Patient).is_none());
        assert!(authenticate("nobody@demo.com", Role::Patient).is_none());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let token = Uuid::new_v4();
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some(token));

        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Basic abc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_require_role() {
        let session = CurrentSession {
            token: Uuid::new_v4(),
            user: mock_users()[0].clone(),
        };
        assert!(session.require(Role::Patient).is_ok());
        assert!(matches!(session.require(Role::Doctor), Err(AppError::Forbidden)));
    }
}
