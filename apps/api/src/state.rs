use crate::config::Config;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions. Each owns its documents and its AI gateway.
    pub sessions: SessionRegistry,
    pub config: Config,
}
