//! The simulation state machine.
//!
//! [`Simulation`] owns everything that evolves over one run: the phase, the
//! semi-structured state tree, the append-only log, and the day counter.
//! It contains no model or network code — the caller feeds it profile
//! submissions, scenario text, and parsed replies, and it advances
//! deterministically.

use crate::directive::apply_directive;
use crate::parse::ModelReply;
use crate::phase::{Phase, PhaseEvent, TransitionError};
use crate::state::SessionState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Last day that can be played before the hard cap ends the run.
const FINAL_DAY: u32 = 11;

/// How many recent log entries are offered as prompt context.
const RECENT_EVENTS_WINDOW: usize = 3;

/// Errors from driving the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("name and location are both required")]
    IncompleteProfile,

    #[error("scenario text was empty")]
    EmptyScenario,

    #[error("narrative text was empty")]
    EmptyNarrative,
}

/// Identity attributes collected before the run starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub location: String,
    /// "Boss" / "Employee" style audience selector, when collected.
    pub profile_type: Option<String>,
    /// Free-text description of the professional environment.
    pub description: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, age: u32, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            location: location.into(),
            profile_type: None,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_profile_type(mut self, profile_type: impl Into<String>) -> Self {
        self.profile_type = Some(profile_type.into());
        self
    }
}

/// What happened when a turn was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The day the turn was played on.
    pub day: u32,
    /// True when this turn ended the run (day cap or resource exhaustion).
    pub ended: bool,
}

/// One simulation run: phase, state tree, log, and day counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    phase: Phase,
    state: SessionState,
    log: Vec<String>,
    current_day: u32,
    latest_update: String,
    advice: Option<String>,
}

impl Simulation {
    /// A fresh simulation, waiting for a profile.
    pub fn new() -> Self {
        Self {
            phase: Phase::CollectingInfo,
            state: SessionState::new(),
            log: Vec::new(),
            current_day: 0,
            latest_update: String::new(),
            advice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Full event log, oldest first. Append-only; never truncated.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    /// The most recent narrative, shown at the top of each turn.
    pub fn latest_update(&self) -> &str {
        &self.latest_update
    }

    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    pub fn set_advice(&mut self, advice: impl Into<String>) {
        self.advice = Some(advice.into());
    }

    /// The trailing window of log entries used as prompt context.
    pub fn recent_events(&self) -> &[String] {
        let start = self.log.len().saturating_sub(RECENT_EVENTS_WINDOW);
        &self.log[start..]
    }

    /// Submit the intake profile and move on to scenario generation.
    ///
    /// Name and location are required; everything else is optional. The
    /// profile is written once and not touched again for the rest of the
    /// run.
    pub fn submit_profile(&mut self, profile: Profile) -> Result<(), SimulationError> {
        if profile.name.trim().is_empty() || profile.location.trim().is_empty() {
            return Err(SimulationError::IncompleteProfile);
        }
        let next = self.phase.transition(PhaseEvent::ProfileSubmitted)?;

        self.state.insert(
            "profile",
            serde_json::json!({
                "name": profile.name,
                "age": profile.age,
                "location": profile.location,
            }),
        );
        if let Some(profile_type) = profile.profile_type {
            self.state
                .insert("profile_type", serde_json::Value::String(profile_type));
        }
        if !profile.description.is_empty() {
            self.state
                .insert("description", serde_json::Value::String(profile.description));
        }
        self.state.set_status("Day 1");

        self.phase = next;
        Ok(())
    }

    /// Seed the run with the generated scenario and start day 1.
    ///
    /// Empty scenario text keeps the session in `generating_scenario` so
    /// the caller can offer a retry.
    pub fn seed_scenario(&mut self, scenario: &str) -> Result<(), SimulationError> {
        let scenario = scenario.trim();
        if scenario.is_empty() {
            self.phase = self.phase.transition(PhaseEvent::ScenarioFailed)?;
            return Err(SimulationError::EmptyScenario);
        }
        let next = self.phase.transition(PhaseEvent::ScenarioReady)?;

        self.log = vec![scenario.to_string()];
        self.latest_update = scenario.to_string();
        self.current_day = 1;

        self.phase = next;
        Ok(())
    }

    /// Apply one turn: log the action and narrative, run every directive,
    /// advance the day, and decide whether the run ends.
    ///
    /// The end-of-run check looks at the day the turn was played, so with a
    /// day-1 seed the run spans days 1 through 11 — eleven turns — unless
    /// food or water runs out first (absent entries count as "ok").
    pub fn apply_turn(
        &mut self,
        action: &str,
        reply: &ModelReply,
    ) -> Result<TurnOutcome, SimulationError> {
        if self.phase != Phase::InSimulation {
            return Err(TransitionError {
                phase: self.phase,
                event: PhaseEvent::TurnSurvived,
            }
            .into());
        }
        if reply.narrative.trim().is_empty() {
            return Err(SimulationError::EmptyNarrative);
        }

        self.log.push(format!("Your action: {action}"));
        self.log.push(reply.narrative.clone());
        self.latest_update = reply.narrative.clone();

        for directive in &reply.directives {
            apply_directive(&mut self.state, directive);
        }

        // If the model left the status on the day we just played, roll it
        // forward; the tracked counter advances regardless.
        if self.state.status_day() == Some(self.current_day) {
            self.state.set_status(format!("Day {}", self.current_day + 1));
        }

        let played = self.current_day;
        self.current_day += 1;

        let starved = self.state.resource_or("food", 1) <= 0;
        let parched = self.state.resource_or("water", 1) <= 0;
        let ended = played >= FINAL_DAY || starved || parched;

        debug!(
            day = played,
            directives = reply.directives.len(),
            ended,
            "turn applied"
        );

        let event = if ended {
            PhaseEvent::SimulationEnded
        } else {
            PhaseEvent::TurnSurvived
        };
        self.phase = self.phase.transition(event)?;

        Ok(TurnOutcome { day: played, ended })
    }

    /// Start a new crisis with the same person: profile, family, and
    /// vulnerabilities survive; everything else is cleared.
    pub fn start_new_crisis(&mut self) -> Result<(), SimulationError> {
        let next = self.phase.transition(PhaseEvent::NewCrisis)?;

        let mut carried = SessionState::new();
        for key in ["profile", "family", "vulnerabilities"] {
            if let Some(value) = self.state.remove(key) {
                carried.insert(key, value);
            }
        }
        self.state = carried;
        self.log.clear();
        self.current_day = 0;
        self.latest_update.clear();
        self.advice = None;

        self.phase = next;
        Ok(())
    }

    /// Discard everything and return to profile intake.
    pub fn reset(&mut self) {
        // FullReset is legal from every phase, so this cannot fail.
        *self = Self::new();
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_simulation() -> Simulation {
        let mut sim = Simulation::new();
        sim.submit_profile(Profile::new("Ada", 34, "Lyon")).unwrap();
        sim.seed_scenario("A flash flood cuts off the roads around you.")
            .unwrap();
        sim
    }

    #[test]
    fn test_profile_requires_name_and_location() {
        let mut sim = Simulation::new();
        assert!(matches!(
            sim.submit_profile(Profile::new("", 34, "Lyon")),
            Err(SimulationError::IncompleteProfile)
        ));
        assert!(matches!(
            sim.submit_profile(Profile::new("Ada", 34, "  ")),
            Err(SimulationError::IncompleteProfile)
        ));
        assert_eq!(sim.phase(), Phase::CollectingInfo);

        sim.submit_profile(Profile::new("Ada", 34, "Lyon")).unwrap();
        assert_eq!(sim.phase(), Phase::GeneratingScenario);
        assert_eq!(sim.state().status(), Some("Day 1"));
    }

    #[test]
    fn test_empty_scenario_keeps_retry_phase() {
        let mut sim = Simulation::new();
        sim.submit_profile(Profile::new("Ada", 34, "Lyon")).unwrap();
        assert!(matches!(
            sim.seed_scenario("   "),
            Err(SimulationError::EmptyScenario)
        ));
        assert_eq!(sim.phase(), Phase::GeneratingScenario);

        sim.seed_scenario("Water is rising.").unwrap();
        assert_eq!(sim.phase(), Phase::InSimulation);
        assert_eq!(sim.current_day(), 1);
        assert_eq!(sim.log(), ["Water is rising."]);
    }

    #[test]
    fn test_turn_appends_action_and_narrative() {
        let mut sim = started_simulation();
        let reply = ModelReply::narrative("You reach higher ground.");
        sim.apply_turn("climb the stairs", &reply).unwrap();

        assert_eq!(
            sim.log(),
            [
                "A flash flood cuts off the roads around you.",
                "Your action: climb the stairs",
                "You reach higher ground."
            ]
        );
        assert_eq!(sim.latest_update(), "You reach higher ground.");
        assert_eq!(sim.current_day(), 2);
    }

    #[test]
    fn test_empty_narrative_rejected_without_mutation() {
        let mut sim = started_simulation();
        let before_log_len = sim.log().len();
        let err = sim.apply_turn("wait", &ModelReply::narrative("  "));
        assert!(matches!(err, Err(SimulationError::EmptyNarrative)));
        assert_eq!(sim.log().len(), before_log_len);
        assert_eq!(sim.current_day(), 1);
    }

    #[test]
    fn test_turn_outside_simulation_rejected() {
        let mut sim = Simulation::new();
        assert!(matches!(
            sim.apply_turn("act", &ModelReply::narrative("x")),
            Err(SimulationError::Transition(_))
        ));
    }

    #[test]
    fn test_day_counter_independent_of_status_directives() {
        let mut sim = started_simulation();

        // No directive touches status; the counter still advances by one.
        sim.apply_turn("wait", &ModelReply::narrative("Nothing happens."))
            .unwrap();
        assert_eq!(sim.current_day(), 2);

        // A status directive does not double-advance it.
        let reply =
            ModelReply::with_directives("A long day.", ["update status to \"Day 99\""]);
        sim.apply_turn("wait more", &reply).unwrap();
        assert_eq!(sim.current_day(), 3);
        assert_eq!(sim.state().status(), Some("Day 99"));
    }

    #[test]
    fn test_status_day_rolls_forward_when_in_sync() {
        let mut sim = started_simulation();
        assert_eq!(sim.state().status(), Some("Day 1"));
        sim.apply_turn("hold tight", &ModelReply::narrative("Night falls."))
            .unwrap();
        assert_eq!(sim.state().status(), Some("Day 2"));
    }

    #[test]
    fn test_resource_exhaustion_ends_run() {
        let mut sim = started_simulation();
        let reply = ModelReply::with_directives(
            "Your supplies are ruined by the water.",
            ["set resources.food to 10", "decrease resources.food by 15"],
        );
        let outcome = sim.apply_turn("salvage the pantry", &reply).unwrap();
        assert!(outcome.ended);
        assert_eq!(sim.state().resource("food"), Some(0));
        assert_eq!(sim.phase(), Phase::Recap);
    }

    #[test]
    fn test_day_cap_after_eleven_turns() {
        let mut sim = started_simulation();
        for turn in 1..=10 {
            let outcome = sim
                .apply_turn("keep going", &ModelReply::narrative("Another day passes."))
                .unwrap();
            assert!(!outcome.ended, "run ended early on turn {turn}");
            assert_eq!(sim.phase(), Phase::InSimulation);
        }
        let outcome = sim
            .apply_turn("keep going", &ModelReply::narrative("The crisis subsides."))
            .unwrap();
        assert!(outcome.ended);
        assert_eq!(outcome.day, 11);
        assert_eq!(sim.phase(), Phase::Recap);
    }

    #[test]
    fn test_recent_events_window() {
        let mut sim = started_simulation();
        for i in 0..4 {
            sim.apply_turn(&format!("action {i}"), &ModelReply::narrative(format!("outcome {i}")))
                .unwrap();
        }
        let recent = sim.recent_events();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent.last().map(String::as_str), Some("outcome 3"));
    }

    #[test]
    fn test_new_crisis_preserves_profile_only() {
        let mut sim = started_simulation();
        let reply = ModelReply::with_directives(
            "The cellar floods.",
            ["set resources.water to 0", "add injuries \"cut hand\""],
        );
        sim.apply_turn("check the cellar", &reply).unwrap();
        assert_eq!(sim.phase(), Phase::Recap);
        sim.set_advice("Keep a go-bag.");

        sim.start_new_crisis().unwrap();
        assert_eq!(sim.phase(), Phase::GeneratingScenario);
        assert!(sim.state().get("profile").is_some());
        assert!(sim.state().get("resources").is_none());
        assert!(sim.state().get("injuries").is_none());
        assert!(sim.log().is_empty());
        assert_eq!(sim.current_day(), 0);
        assert!(sim.advice().is_none());
    }

    #[test]
    fn test_full_reset_clears_everything() {
        let mut sim = started_simulation();
        sim.reset();
        assert_eq!(sim.phase(), Phase::CollectingInfo);
        assert!(sim.state().is_empty());
        assert!(sim.log().is_empty());
    }
}
