//! CrisisSession - the primary public API for running a simulation.
//!
//! Wires a [`CrisisDirector`] to a [`Simulation`] and walks the phase
//! sequence: profile intake, scenario generation (with retry), turns, and
//! the recap with memoized advice. One session, one user, strictly
//! sequential turns.

use crate::director::{CrisisDirector, DirectorConfig, DirectorError};
use crate::phase::Phase;
use crate::simulation::{Profile, Simulation, SimulationError, TurnOutcome};
use crate::state::SessionState;
use serde_json::Value;
use thiserror::Error;

/// Errors from CrisisSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("director error: {0}")]
    Director(#[from] DirectorError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("No API key configured - set MISTRAL_API_KEY environment variable")]
    NoApiKey,
}

/// Configuration for creating a new session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Model override for all generation steps.
    pub model: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Maximum tokens per generation; 0 keeps the director default.
    pub max_tokens: usize,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn director_config(&self) -> DirectorConfig {
        let defaults = DirectorConfig::default();
        DirectorConfig {
            model: self.model.clone(),
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: if self.max_tokens == 0 {
                defaults.max_tokens
            } else {
                self.max_tokens
            },
        }
    }
}

/// Result of one played turn, for display.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Narrative outcome of the action.
    pub narrative: String,

    /// Day the turn was played on.
    pub day: u32,

    /// Whether the run ended with this turn.
    pub ended: bool,
}

/// A crisis simulation session.
pub struct CrisisSession {
    director: CrisisDirector,
    simulation: Simulation,
}

impl CrisisSession {
    /// Create a new session.
    ///
    /// Requires `MISTRAL_API_KEY` in the environment.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let director = CrisisDirector::from_env()
            .map_err(|_| SessionError::NoApiKey)?
            .with_config(config.director_config());
        Ok(Self {
            director,
            simulation: Simulation::new(),
        })
    }

    /// Create a session around an existing director.
    pub fn with_director(director: CrisisDirector) -> Self {
        Self {
            director,
            simulation: Simulation::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.simulation.phase()
    }

    pub fn state(&self) -> &SessionState {
        self.simulation.state()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Submit the intake profile.
    pub fn submit_profile(&mut self, profile: Profile) -> Result<(), SessionError> {
        self.simulation.submit_profile(profile)?;
        Ok(())
    }

    /// Ask the director for an opening scenario and seed the run with it.
    ///
    /// On failure (or an empty scenario) the session stays in
    /// `generating_scenario` so this can simply be called again.
    pub async fn generate_scenario(&mut self) -> Result<String, SessionError> {
        let scenario = self
            .director
            .generate_scenario(self.simulation.state())
            .await?;
        self.simulation.seed_scenario(&scenario)?;
        Ok(scenario.trim().to_string())
    }

    /// Play one turn: resolve the action through the director and apply
    /// the parsed reply.
    pub async fn decide(&mut self, action: &str) -> Result<TurnReport, SessionError> {
        let reply = self
            .director
            .process_decision(
                self.simulation.state(),
                action,
                self.simulation.recent_events(),
            )
            .await?;

        let outcome: TurnOutcome = self.simulation.apply_turn(action, &reply)?;
        Ok(TurnReport {
            narrative: reply.narrative,
            day: outcome.day,
            ended: outcome.ended,
        })
    }

    /// Personalized advice for the completed run. Generated once, then
    /// served from the session.
    pub async fn advice(&mut self) -> Result<String, SessionError> {
        if let Some(advice) = self.simulation.advice() {
            return Ok(advice.to_string());
        }

        let profile = self
            .simulation
            .state()
            .get("profile")
            .cloned()
            .unwrap_or(Value::Null);
        let advice = self
            .director
            .generate_advice(&profile, self.simulation.state(), self.simulation.log())
            .await?;
        self.simulation.set_advice(&advice);
        Ok(advice)
    }

    /// Keep the profile, start a fresh crisis.
    pub fn start_new_crisis(&mut self) -> Result<(), SessionError> {
        self.simulation.start_new_crisis()?;
        Ok(())
    }

    /// Discard everything and return to profile intake.
    pub fn reset(&mut self) {
        self.simulation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new()
            .with_model("mistral-small-latest")
            .with_temperature(0.4)
            .with_max_tokens(512);

        let director_config = config.director_config();
        assert_eq!(director_config.model.as_deref(), Some("mistral-small-latest"));
        assert_eq!(director_config.temperature, Some(0.4));
        assert_eq!(director_config.max_tokens, 512);
    }

    #[test]
    fn test_session_config_defaults_pass_through() {
        let director_config = SessionConfig::new().director_config();
        assert_eq!(director_config.temperature, Some(0.7));
        assert_eq!(director_config.max_tokens, 1000);
    }
}
