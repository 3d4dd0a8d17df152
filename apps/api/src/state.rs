use std::sync::Arc;

use chrono::Duration;

use crate::auth::SessionStore;
use crate::chat::CompletionBackend;
use crate::config::Config;
use crate::directory::Directory;
use crate::layout::{default_page_config, PageConfig};
use crate::registration::RegistrationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub registry: RegistrationStore,
    pub directory: Directory,
    /// `None` when no completion API key is configured.
    pub chat: Option<Arc<dyn CompletionBackend>>,
    /// Page geometry for every generated document.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(config: &Config, chat: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self {
            page_config: default_page_config(config.page_margin_mm),
            sessions: SessionStore::new(Duration::minutes(config.session_ttl_minutes)),
            registry: RegistrationStore::default(),
            directory: Directory::default(),
            chat,
        }
    }
}
