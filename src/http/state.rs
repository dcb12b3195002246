use crate::session::SessionOrchestrator;
use crate::theme::ThemeStore;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single interpreter session controller
    pub orchestrator: SessionOrchestrator,
    /// Theme preference store
    pub theme: Arc<ThemeStore>,
}

impl AppState {
    pub fn new(orchestrator: SessionOrchestrator, theme: Arc<ThemeStore>) -> Self {
        Self { orchestrator, theme }
    }
}
