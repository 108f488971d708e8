//! HTTP routing for the crisis API.

use crate::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router.
///
/// Routes live under `/api/app`, mirroring the paths the interaction
/// surface already calls. CORS is wide open, as the service fronts a
/// browser client on another origin.
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .route("/test", get(handlers::test))
        .route("/chat", post(handlers::chat))
        .route("/crisis/scenario", post(handlers::crisis_scenario))
        .route("/crisis/decision", post(handlers::crisis_decision))
        .route("/crisis/advice", post(handlers::crisis_advice))
        .with_state(app_state);

    Router::new().nest("/api/app", api_router).layer(cors)
}
