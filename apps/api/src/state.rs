use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatCompletion;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend behind a trait object so tests can substitute a stub.
    pub backend: Arc<dyn ChatCompletion>,
    pub sessions: SessionStore,
    /// Startup configuration, kept for handlers that grow config needs.
    #[allow(dead_code)]
    pub config: Config,
}
