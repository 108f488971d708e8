//! Axum handlers for the crisis API.
//!
//! Each handler calls the director and wraps the outcome in the uniform
//! envelope. Generation failures come back as an in-body 500 with HTTP
//! 200, which is the retry signal the interaction surface looks for.

use axum::{extract::State, response::Json};
use mistral::Message;
use serde_json::json;
use tracing::error;

use crate::models::{AdviceRequest, DecisionRequest, Envelope};
use crate::state::AppState;

/// `GET /api/app/test` — connectivity probe.
pub async fn test() -> Json<Envelope> {
    Json(Envelope::ok(
        "Backend connected successfully!",
        json!({
            "service": "crisis-api",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ))
}

/// `POST /api/app/chat` — relay a conversation to the completion API.
pub async fn chat(
    State(state): State<AppState>,
    Json(conversation): Json<Vec<Message>>,
) -> Json<Envelope> {
    match state.director.chat(conversation).await {
        Ok(response) => Json(Envelope::ok(
            "Chat response generated successfully",
            json!({ "response": response }),
        )),
        Err(e) => {
            error!("chat relay failed: {e}");
            Json(Envelope::error("Failed to get response from Mistral API"))
        }
    }
}

/// `POST /api/app/crisis/scenario` — generate the opening scenario.
pub async fn crisis_scenario(
    State(state): State<AppState>,
    Json(initial_state): Json<crisis_core::SessionState>,
) -> Json<Envelope> {
    match state.director.generate_scenario(&initial_state).await {
        Ok(scenario) => Json(Envelope::ok(
            "Crisis scenario generated successfully",
            json!({ "scenario": scenario }),
        )),
        Err(e) => {
            error!("scenario generation failed: {e}");
            Json(Envelope::error("Failed to generate crisis scenario"))
        }
    }
}

/// `POST /api/app/crisis/decision` — resolve one user decision.
///
/// Returns the parsed narrative and directive list; applying the
/// directives is the caller's job, so the state here is read-only.
pub async fn crisis_decision(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> Json<Envelope> {
    let DecisionRequest {
        state: session_state,
        user_action,
        recent_events,
    } = request;

    match state
        .director
        .process_decision(&session_state, &user_action, &recent_events)
        .await
    {
        Ok(reply) => Json(Envelope::ok(
            "Decision processed successfully",
            json!({
                "next_situation": reply.narrative,
                "json_modifications": reply.directives,
            }),
        )),
        Err(e) => {
            error!("decision processing failed: {e}");
            Json(Envelope::error("Failed to process decision"))
        }
    }
}

/// `POST /api/app/crisis/advice` — post-run personalized advice.
pub async fn crisis_advice(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Json<Envelope> {
    match state
        .director
        .generate_advice(&request.profile, &request.final_state, &request.simulation_log)
        .await
    {
        Ok(advice) => Json(Envelope::ok(
            "Advice generated successfully",
            json!({ "advice": advice }),
        )),
        Err(e) => {
            error!("advice generation failed: {e}");
            Json(Envelope::error("Failed to generate advice"))
        }
    }
}
