//! QA tests that exercise the full session against the real Mistral API.
//!
//! These are ignored by default and only meaningful with a key configured:
//!
//! `MISTRAL_API_KEY=$MISTRAL_API_KEY cargo test -p crisis-core live_api -- --ignored --nocapture`

use crisis_core::{CrisisSession, Phase, Profile, SessionConfig};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("MISTRAL_API_KEY").is_ok()
}

#[tokio::test]
#[ignore]
async fn test_scenario_generation() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: MISTRAL_API_KEY not set");
        return;
    }

    let mut session = CrisisSession::new(SessionConfig::new()).expect("session");
    session
        .submit_profile(Profile::new("Ada", 34, "Lyon, France"))
        .expect("profile");

    let scenario = session.generate_scenario().await.expect("scenario");
    println!("SCENARIO:\n{scenario}");

    assert!(!scenario.is_empty());
    assert_eq!(session.phase(), Phase::InSimulation);
    assert_eq!(session.simulation().current_day(), 1);
}

#[tokio::test]
#[ignore]
async fn test_one_full_turn() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: MISTRAL_API_KEY not set");
        return;
    }

    let mut session = CrisisSession::new(SessionConfig::new()).expect("session");
    session
        .submit_profile(
            Profile::new("Ada", 34, "Lyon, France")
                .with_description("Works from a ground-floor flat near the river"),
        )
        .expect("profile");
    session.generate_scenario().await.expect("scenario");

    let report = session
        .decide("I move my important documents upstairs and fill the bathtub with water")
        .await
        .expect("turn");

    println!("DAY {}:\n{}", report.day, report.narrative);
    assert!(!report.narrative.is_empty());
    assert_eq!(report.day, 1);
    assert_eq!(session.simulation().current_day(), 2);
}
