use std::sync::Arc;

use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable resume store. Postgres in production, in-memory for tests
    /// and `RESUME_STORE=memory`.
    pub store: Arc<dyn ResumeStore>,
}
