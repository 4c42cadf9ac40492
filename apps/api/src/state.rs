use crate::compatibility::orchestrator::Orchestrator;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Holds the model client and profile source behind trait objects.
    pub orchestrator: Orchestrator,
    pub config: Config,
}
