//! Shared application state.

use crisis_core::CrisisDirector;
use std::sync::Arc;

/// Shared state created once at startup and handed to every handler.
///
/// The director is stateless between requests — session state travels in
/// each request body — so a single shared instance serves all callers.
#[derive(Clone)]
pub struct AppState {
    pub director: Arc<CrisisDirector>,
}

impl AppState {
    pub fn new(director: CrisisDirector) -> Self {
        Self {
            director: Arc::new(director),
        }
    }
}
