use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionStore;
use crate::upstream::StudioBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream endpoints. `HttpBackend` in production; swapped for a fake in tests.
    pub backend: Arc<dyn StudioBackend>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn StudioBackend>) -> Self {
        Self {
            config,
            backend,
            sessions: SessionStore::default(),
        }
    }
}
