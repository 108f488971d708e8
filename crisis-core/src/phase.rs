//! Session phases and the transition table.
//!
//! A session moves through a fixed sequence of phases. Transitions are
//! driven by explicit events and validated by a single transition function;
//! an event that is not legal in the current phase is an error, not a
//! silent fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The phase a session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user's profile.
    CollectingInfo,
    /// Waiting for a scenario from the model.
    GeneratingScenario,
    /// Turns are being played.
    InSimulation,
    /// The run has ended; showing the recap and advice.
    Recap,
    /// A phase label this version does not recognize. Terminal; the only
    /// way out is a full reset.
    Unknown,
}

/// An event that can advance the session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// A profile with non-empty name and location was submitted.
    ProfileSubmitted,
    /// A non-empty scenario arrived from the model.
    ScenarioReady,
    /// Scenario generation failed or came back empty; stay and retry.
    ScenarioFailed,
    /// A turn was applied and the simulation continues.
    TurnSurvived,
    /// A turn was applied and hit the day cap or exhausted a resource.
    SimulationEnded,
    /// Start a new crisis with the same profile.
    NewCrisis,
    /// Discard everything and start over.
    FullReset,
}

/// An event arrived in a phase where it is not legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event {event:?} is not valid in phase {phase}")]
pub struct TransitionError {
    pub phase: Phase,
    pub event: PhaseEvent,
}

impl Phase {
    /// Apply an event, yielding the next phase.
    ///
    /// A full reset is accepted from any phase; every other event is only
    /// legal where the table below says it is.
    pub fn transition(self, event: PhaseEvent) -> Result<Phase, TransitionError> {
        use Phase::*;
        use PhaseEvent::*;

        let next = match (self, event) {
            (_, FullReset) => CollectingInfo,
            (CollectingInfo, ProfileSubmitted) => GeneratingScenario,
            (GeneratingScenario, ScenarioReady) => InSimulation,
            (GeneratingScenario, ScenarioFailed) => GeneratingScenario,
            (InSimulation, TurnSurvived) => InSimulation,
            (InSimulation, SimulationEnded) => Recap,
            (Recap, NewCrisis) => GeneratingScenario,
            (phase, event) => return Err(TransitionError { phase, event }),
        };
        Ok(next)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::CollectingInfo => "collecting_info",
            Phase::GeneratingScenario => "generating_scenario",
            Phase::InSimulation => "in_simulation",
            Phase::Recap => "recap",
            Phase::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = std::convert::Infallible;

    /// Parse a phase label. Unrecognized labels map to [`Phase::Unknown`]
    /// rather than failing, matching how the display layer treats them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "collecting_info" => Phase::CollectingInfo,
            "generating_scenario" => Phase::GeneratingScenario,
            "in_simulation" => Phase::InSimulation,
            "recap" => Phase::Recap,
            _ => Phase::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = Phase::CollectingInfo;
        let phase = phase.transition(PhaseEvent::ProfileSubmitted).unwrap();
        assert_eq!(phase, Phase::GeneratingScenario);
        let phase = phase.transition(PhaseEvent::ScenarioReady).unwrap();
        assert_eq!(phase, Phase::InSimulation);
        let phase = phase.transition(PhaseEvent::TurnSurvived).unwrap();
        assert_eq!(phase, Phase::InSimulation);
        let phase = phase.transition(PhaseEvent::SimulationEnded).unwrap();
        assert_eq!(phase, Phase::Recap);
    }

    #[test]
    fn test_scenario_retry_stays_put() {
        assert_eq!(
            Phase::GeneratingScenario
                .transition(PhaseEvent::ScenarioFailed)
                .unwrap(),
            Phase::GeneratingScenario
        );
    }

    #[test]
    fn test_recap_loops() {
        assert_eq!(
            Phase::Recap.transition(PhaseEvent::NewCrisis).unwrap(),
            Phase::GeneratingScenario
        );
        assert_eq!(
            Phase::Recap.transition(PhaseEvent::FullReset).unwrap(),
            Phase::CollectingInfo
        );
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let err = Phase::CollectingInfo
            .transition(PhaseEvent::TurnSurvived)
            .unwrap_err();
        assert_eq!(err.phase, Phase::CollectingInfo);

        assert!(Phase::Recap.transition(PhaseEvent::ScenarioReady).is_err());
        assert!(Phase::InSimulation
            .transition(PhaseEvent::ProfileSubmitted)
            .is_err());
    }

    #[test]
    fn test_unknown_only_resets() {
        assert!(Phase::Unknown.transition(PhaseEvent::TurnSurvived).is_err());
        assert_eq!(
            Phase::Unknown.transition(PhaseEvent::FullReset).unwrap(),
            Phase::CollectingInfo
        );
    }

    #[test]
    fn test_from_str_fallback() {
        assert_eq!("in_simulation".parse::<Phase>().unwrap(), Phase::InSimulation);
        assert_eq!("totally_bogus".parse::<Phase>().unwrap(), Phase::Unknown);
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(
            serde_json::to_string(&Phase::CollectingInfo).unwrap(),
            "\"collecting_info\""
        );
        let phase: Phase = serde_json::from_str("\"recap\"").unwrap();
        assert_eq!(phase, Phase::Recap);
    }
}
