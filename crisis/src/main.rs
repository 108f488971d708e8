//! Terminal frontend for the crisis simulation.
//!
//! Walks one session through its phases on stdin/stdout: profile intake,
//! scenario generation with retry, the turn loop, and the recap with
//! personalized advice.

use anyhow::Result;
use crisis_core::{CrisisSession, Phase, Profile, SessionConfig, SessionError};
use serde_json::Value;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if std::env::var("MISTRAL_API_KEY").is_err() {
        eprintln!("Error: MISTRAL_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export MISTRAL_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let mut session = CrisisSession::new(SessionConfig::new())?;

    println!("=== Crisis Simulation ===");
    println!("An interactive preparedness exercise: describe yourself, face a");
    println!("generated crisis one day at a time, and get advice at the end.\n");

    loop {
        match session.phase() {
            Phase::CollectingInfo => collect_profile(&mut session)?,
            Phase::GeneratingScenario => {
                if !generate_scenario(&mut session).await? {
                    return Ok(());
                }
            }
            Phase::InSimulation => play_turn(&mut session).await?,
            Phase::Recap => {
                if !run_recap(&mut session).await? {
                    return Ok(());
                }
            }
            Phase::Unknown => {
                eprintln!("Unknown application state; resetting.");
                session.reset();
            }
        }
    }
}

/// Prompt for the intake profile until a valid one is submitted.
fn collect_profile(session: &mut CrisisSession) -> Result<()> {
    println!("--- Tell us about yourself ---");
    let name = read_line("Your name: ")?;
    let age = read_line("Your age: ")?.parse().unwrap_or(30);
    let location = read_line("Your location (city/region/country): ")?;
    let description = read_line("Your professional environment (optional): ")?;

    let profile = Profile::new(name, age, location).with_description(description);
    if let Err(e) = session.submit_profile(profile) {
        println!("{e}\n");
    }
    Ok(())
}

/// Generate the opening scenario; returns false when the user quits.
async fn generate_scenario(session: &mut CrisisSession) -> Result<bool> {
    println!("\nGenerating a personalized crisis scenario...");
    match session.generate_scenario().await {
        Ok(scenario) => {
            println!("\n--- Day 1 ---");
            println!("{scenario}\n");
            Ok(true)
        }
        Err(e) => {
            println!("Failed to generate a crisis scenario: {e}");
            let again = read_line("Try again? [y/N] ")?;
            Ok(again.trim().eq_ignore_ascii_case("y"))
        }
    }
}

/// Play one turn of the simulation.
async fn play_turn(session: &mut CrisisSession) -> Result<()> {
    render_state(session);

    let action = read_line("\nWhat do you do next? ")?;
    if action.trim().is_empty() {
        return Ok(());
    }

    println!("Processing your decision...");
    match session.decide(&action).await {
        Ok(report) => {
            if report.ended {
                println!("\nThe crisis has run its course.\n");
            } else {
                println!("\n--- Day {} ---\n", report.day + 1);
            }
        }
        Err(SessionError::Simulation(e)) => println!("{e}\n"),
        Err(e) => println!("Failed to process your decision: {e}\n"),
    }
    Ok(())
}

/// Show the recap and advice; returns false when the user quits.
async fn run_recap(session: &mut CrisisSession) -> Result<bool> {
    println!("=== Simulation Over ===\n");
    render_state(session);

    println!("\n--- Timeline ---");
    for (i, event) in session.simulation().log().iter().enumerate() {
        println!("Event {}: {event}", i + 1);
    }

    println!("\nGenerating personalized advice...");
    match session.advice().await {
        Ok(advice) => println!("\n--- Advice ---\n{advice}"),
        Err(e) => println!("Unable to generate personalized advice: {e}"),
    }

    loop {
        let choice = read_line("\n[n]ew crisis, [s]tart from scratch, or [q]uit? ")?;
        match choice.trim().to_lowercase().as_str() {
            "n" => {
                session.start_new_crisis()?;
                return Ok(true);
            }
            "s" => {
                session.reset();
                return Ok(true);
            }
            "q" => return Ok(false),
            _ => println!("Please answer n, s, or q."),
        }
    }
}

/// Print the current situation, resources, and family status.
fn render_state(session: &CrisisSession) {
    let simulation = session.simulation();
    if !simulation.latest_update().is_empty() {
        println!("--- Current Situation ---");
        println!("{}\n", simulation.latest_update());
    }

    let state = session.state();
    if let Some(resources) = state.get("resources").and_then(Value::as_object) {
        println!("Resources:");
        for (name, amount) in resources {
            println!("  {name}: {amount}");
        }
    }
    if let Some(family) = state.family_status() {
        println!("Family status:");
        for (member, status) in family {
            match status.as_str() {
                Some(s) => println!("  {member}: {s}"),
                None => println!("  {member}: {status}"),
            }
        }
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
