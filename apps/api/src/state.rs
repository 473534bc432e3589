use std::sync::Arc;

use crate::ai::AiService;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence port. In-memory or PostgreSQL, picked at startup.
    pub store: Arc<dyn JobStore>,
    /// AI port. Gemini in production, stubs in tests.
    pub ai: Arc<dyn AiService>,
}
