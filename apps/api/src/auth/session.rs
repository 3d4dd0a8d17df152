//! Server-side sessions.
//!
//! A session is created at login and removed at logout or once it outlives
//! the configured lifetime. Everything a user builds up while signed in lives
//! inside it and disappears with it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::ChatTranscript;
use crate::directory::profile::Profile;
use crate::documents::diet_chart::DietChart;
use crate::models::user::User;
use crate::tracker::log::HealthLog;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
    pub health_log: HealthLog,
    /// Drafts keyed by patient id.
    pub diet_chart_drafts: HashMap<String, DietChart>,
    pub chat: ChatTranscript,
}

impl Session {
    fn new(user: User) -> Self {
        Self {
            token: Uuid::new_v4(),
            profile: Profile::for_user(&user),
            user,
            created_at: Utc::now(),
            health_log: HealthLog::default(),
            diet_chart_drafts: HashMap::new(),
            chat: ChatTranscript::default(),
        }
    }
}

impl Session {
    fn is_live(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at < ttl
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Sessions expire `ttl` after login.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
        }
    }

    /// Opens a session for `user` and returns its token. Expired sessions
    /// are dropped on the way.
    pub async fn create(&self, user: User) -> Uuid {
        let session = Session::new(user);
        let token = session.token;
        info!(user = %session.user.email, role = session.user.role.as_str(), "session opened");

        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, s| s.is_live(self.ttl, now));
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, "expired sessions dropped");
        }
        sessions.insert(token, session);
        token
    }

    /// Removes the session. Returns whether it existed.
    pub async fn end(&self, token: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&token);
        if let Some(session) = &removed {
            info!(user = %session.user.email, "session closed");
        }
        removed.is_some()
    }

    pub async fn user(&self, token: Uuid) -> Option<User> {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .get(&token)
            .filter(|s| s.is_live(self.ttl, now))
            .map(|s| s.user.clone())
    }

    /// Runs `f` against the session while holding the write lock.
    ///
    /// `f` is synchronous so the lock is never held across an await point.
    pub async fn with_session<R>(&self, token: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        sessions
            .get_mut(&token)
            .filter(|s| s.is_live(self.ttl, now))
            .map(f)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::mock_users;
    use crate::tracker::scoring::HealthReading;

    fn store() -> SessionStore {
        SessionStore::new(Duration::hours(1))
    }

    #[tokio::test]
    async fn test_create_and_end() {
        let store = store();
        let user = mock_users()[0].clone();
        let token = store.create(user.clone()).await;

        assert_eq!(store.user(token).await, Some(user));
        assert_eq!(store.len().await, 1);
        assert!(store.end(token).await);
        assert!(!store.end(token).await);
        assert_eq!(store.user(token).await, None);
    }

    #[tokio::test]
    async fn test_session_state_is_cleared_at_logout() {
        let store = store();
        let user = mock_users()[0].clone();
        let token = store.create(user.clone()).await;

        let today = Utc::now().date_naive();
        store
            .with_session(token, |s| {
                s.health_log
                    .add(HealthReading::new("2000", "110", "1", "100"), today);
            })
            .await
            .unwrap();
        store.end(token).await;

        // A fresh login starts from an empty log.
        let again = store.create(user).await;
        let entries = store
            .with_session(again, |s| s.health_log.len())
            .await
            .unwrap();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_signed_out_and_pruned() {
        let store = SessionStore::new(Duration::zero());
        let user = mock_users()[0].clone();
        let stale = store.create(user.clone()).await;

        assert_eq!(store.user(stale).await, None);
        assert!(store.with_session(stale, |_| ()).await.is_none());

        store.create(user).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_repeated_logins_do_not_accumulate_expired_sessions() {
        let store = SessionStore::new(Duration::zero());
        for user in mock_users().into_iter().cycle().take(10) {
            store.create(user).await;
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_yields_none() {
        let store = store();
        assert!(store.with_session(Uuid::new_v4(), |_| ()).await.is_none());
    }
}
