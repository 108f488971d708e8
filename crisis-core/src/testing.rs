//! Testing utilities for the crisis simulation.
//!
//! Provides a scripted stand-in for the director plus a harness that pairs
//! it with a real [`Simulation`], so scenario tests run the genuine
//! parser/interpreter/state-machine path without any network calls.

use crate::parse::ModelReply;
use crate::phase::Phase;
use crate::simulation::{Profile, Simulation, SimulationError, TurnOutcome};

/// A mock director that returns scripted replies in order.
pub struct MockDirector {
    replies: Vec<ModelReply>,
    reply_index: usize,
}

impl MockDirector {
    /// Create a mock with a script of replies.
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies,
            reply_index: 0,
        }
    }

    /// Append a reply to the script.
    pub fn queue_reply(&mut self, reply: ModelReply) {
        self.replies.push(reply);
    }

    /// Next scripted reply, or a default narrative once the script runs dry.
    pub fn process_decision(&mut self, _action: &str) -> ModelReply {
        if self.reply_index < self.replies.len() {
            let reply = self.replies[self.reply_index].clone();
            self.reply_index += 1;
            reply
        } else {
            ModelReply::narrative("The director has no more scripted replies.")
        }
    }

    /// Replay the script from the beginning.
    pub fn reset(&mut self) {
        self.reply_index = 0;
    }
}

/// Test harness pairing a mock director with a real simulation.
pub struct TestHarness {
    /// The scripted director.
    pub director: MockDirector,
    /// The simulation under test.
    pub simulation: Simulation,
}

impl TestHarness {
    /// A harness already seeded into `in_simulation` with a default
    /// profile and scenario, ready to take turns.
    pub fn new() -> Self {
        let mut simulation = Simulation::new();
        simulation
            .submit_profile(Profile::new("Test Subject", 30, "Test Valley"))
            .expect("default profile is valid");
        simulation
            .seed_scenario("A flash flood cuts off the roads around you.")
            .expect("default scenario is non-empty");

        Self {
            director: MockDirector::new(Vec::new()),
            simulation,
        }
    }

    /// A harness still waiting for a profile.
    pub fn unstarted() -> Self {
        Self {
            director: MockDirector::new(Vec::new()),
            simulation: Simulation::new(),
        }
    }

    /// Queue a narrative-only reply.
    pub fn expect_narrative(&mut self, text: impl Into<String>) -> &mut Self {
        self.director.queue_reply(ModelReply::narrative(text));
        self
    }

    /// Queue a reply with directives.
    pub fn expect_reply(&mut self, reply: ModelReply) -> &mut Self {
        self.director.queue_reply(reply);
        self
    }

    /// Play one turn through the scripted director.
    pub fn act(&mut self, action: &str) -> Result<TurnOutcome, SimulationError> {
        let reply = self.director.process_decision(action);
        self.simulation.apply_turn(action, &reply)
    }

    pub fn phase(&self) -> Phase {
        self.simulation.phase()
    }

    pub fn day(&self) -> u32 {
        self.simulation.current_day()
    }

    pub fn resource(&self, name: &str) -> Option<i64> {
        self.simulation.state().resource(name)
    }

    /// Last log entry, when any.
    pub fn last_log(&self) -> Option<&str> {
        self.simulation.log().last().map(String::as_str)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert a resource holds the expected quantity.
#[track_caller]
pub fn assert_resource(harness: &TestHarness, name: &str, expected: i64) {
    let actual = harness.resource(name);
    assert_eq!(
        actual,
        Some(expected),
        "Expected resource '{name}' to be {expected}, got {actual:?}"
    );
}

/// Assert the session is in the expected phase.
#[track_caller]
pub fn assert_phase(harness: &TestHarness, expected: Phase) {
    assert_eq!(
        harness.phase(),
        expected,
        "Expected phase {expected}, got {}",
        harness.phase()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_director_scripted_order() {
        let mut harness = TestHarness::new();
        harness
            .expect_narrative("Reply 1")
            .expect_narrative("Reply 2");

        harness.act("first").unwrap();
        assert_eq!(harness.last_log(), Some("Reply 1"));

        harness.act("second").unwrap();
        assert_eq!(harness.last_log(), Some("Reply 2"));

        // Exhausted script falls back to a default narrative.
        harness.act("third").unwrap();
        assert!(harness
            .last_log()
            .is_some_and(|log| log.contains("no more scripted")));
    }

    #[test]
    fn test_harness_runs_real_interpreter() {
        let mut harness = TestHarness::new();
        harness.expect_reply(ModelReply::with_directives(
            "You stock up before the shops close.",
            ["set resources.food to 4", "increase resources.water by 2"],
        ));

        harness.act("buy supplies").unwrap();
        assert_resource(&harness, "food", 4);
        assert_resource(&harness, "water", 2);
        assert_phase(&harness, Phase::InSimulation);
    }

    #[test]
    fn test_mock_director_reset() {
        let mut director = MockDirector::new(vec![ModelReply::narrative("only reply")]);
        assert_eq!(director.process_decision("a").narrative, "only reply");
        assert!(director
            .process_decision("b")
            .narrative
            .contains("no more scripted"));
        director.reset();
        assert_eq!(director.process_decision("c").narrative, "only reply");
    }
}
