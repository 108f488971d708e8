//! Prompt construction for the crisis director.
//!
//! Plain builder functions; each returns the single user-role prompt sent
//! for that generation step. The decision prompt carries the output
//! contract the response parser expects.

use crate::state::SessionState;
use serde_json::Value;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Prompt for generating the opening crisis scenario.
pub fn scenario_prompt(state: &SessionState) -> String {
    let location = state
        .get("profile")
        .and_then(|p| p.get("location"))
        .and_then(Value::as_str)
        .unwrap_or("their area");

    format!(
        "Generate a concise description of a sudden crisis scenario (such as \
a flash flood) striking {location}. The person below is caught in it with \
no particular emergency experience, and nearby road access is at risk of \
being cut off. End by asking what their first action is to stay safe.\n\n\
This JSON data represents the person's profile and starting state:\n{}\n",
        pretty(&state.to_value())
    )
}

/// Prompt for resolving one turn of the simulation.
pub fn decision_prompt(state: &SessionState, user_action: &str, recent_events: &[String]) -> String {
    format!(
        "Current Simulation State (JSON):\n{state}\n\n\
User's Action for this Turn: \"{user_action}\"\n\n\
Recent Events:\n{events}\n\n\
Based on the user's action and the current state:\n\
1. Describe the immediate outcome and the situation at the start of the \
next turn. Keep it concise.\n\
2. Suggest specific, incremental modifications to the JSON state \
reflecting these outcomes (e.g., \"decrease resources.food by 1\", \
\"update family member 'John' to 'injured'\"). List these modifications \
clearly.\n\n\
Output format:\n\
NEXT_SITUATION_DESCRIPTION: [Your description here]\n\
JSON_MODIFICATIONS:\n\
- [modification 1]\n\
- [modification 2]\n\
...",
        state = pretty(&state.to_value()),
        events = recent_events.join("\n"),
    )
}

/// Prompt for the post-run personalized advice.
pub fn advice_prompt(profile: &Value, final_state: &SessionState, simulation_log: &[String]) -> String {
    format!(
        "This user just completed a crisis simulation with the following:\n\n\
Initial Profile:\n{profile}\n\n\
Final State:\n{state}\n\n\
Simulation Timeline:\n{log}\n\n\
Based on how this simulation went, provide 3-5 practical, personalized \
pieces of advice to help this person prepare for a real crisis like the \
one simulated. Focus on specific actions they can take based on their \
location, vulnerabilities, and how the simulation played out.",
        profile = pretty(profile),
        state = pretty(&final_state.to_value()),
        log = pretty(&Value::from(simulation_log.to_vec())),
    )
}
