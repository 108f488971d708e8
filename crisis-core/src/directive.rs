//! Directive classification and application.
//!
//! A directive is one short natural-language instruction emitted by the
//! model, e.g. `decrease resources.food by 1`. Classification walks an
//! ordered set of patterns and the first match wins; the matcher order is
//! load-bearing (a `set resources.X to N` must classify as a resource set,
//! never as a generic key-path write) and must not be rearranged.
//!
//! Classification is separate from mutation: [`Directive::classify`] turns
//! text into a tagged variant, [`Directive::apply`] mutates the state.
//! Application is best-effort — a directive that matches nothing, or whose
//! required key is absent, is dropped without disturbing the rest of the
//! turn.

use crate::state::{coerce_value, SessionState};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DECREASE_RESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)decrease\s+resources\.(\w+)\s+by\s+(\d+)").unwrap());
static INCREASE_RESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)increase\s+resources\.(\w+)\s+by\s+(\d+)").unwrap());
static SET_RESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)set\s+resources\.(\w+)\s+to\s+(\d+)").unwrap());
static UPDATE_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)update\s+status\s+to\s+["']?(.*?)["']?$"#).unwrap());
static UPDATE_FAMILY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)update\s+family\s+member\s+["']?(.*?)["']?\s+to\s+["']?(.*?)["']?$"#)
        .unwrap()
});
static ADD_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)add\s+(\w+)\s+["']?(.*?)["']?$"#).unwrap());
static SET_KEY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)set\s+([\w.]+)\s+to\s+["']?(.*?)["']?$"#).unwrap());

/// A classified state-mutation directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `decrease resources.<name> by <n>` — existing keys only, floored at 0.
    ResourceDecrease { name: String, amount: i64 },
    /// `increase resources.<name> by <n>` — creates the key when absent.
    ResourceIncrease { name: String, amount: i64 },
    /// `set resources.<name> to <n>` — unconditional.
    ResourceSet { name: String, amount: i64 },
    /// `update status to <text>`.
    StatusUpdate { text: String },
    /// `update family member <name> to <status>`.
    FamilyUpdate { member: String, status: String },
    /// `add <category> <value>` — appends to a sequence under `category`.
    ListAppend { category: String, value: String },
    /// Generic fallback: `set <dotted.key.path> to <value>`.
    KeyPathSet { path: Vec<String>, value: String },
    /// Nothing matched; carried for logging only.
    Unrecognized { raw: String },
}

impl Directive {
    /// Classify a raw directive line.
    ///
    /// Patterns are tried in precedence order; keyword matching is
    /// case-insensitive. A numeric capture too large to parse falls through
    /// to the later patterns, which is how an oversized `set resources.X
    /// to <huge>` ends up stored as a string by the generic matcher.
    pub fn classify(raw: &str) -> Directive {
        if let Some(caps) = DECREASE_RESOURCE.captures(raw) {
            if let Ok(amount) = caps[2].parse() {
                return Directive::ResourceDecrease {
                    name: caps[1].to_string(),
                    amount,
                };
            }
        }

        if let Some(caps) = INCREASE_RESOURCE.captures(raw) {
            if let Ok(amount) = caps[2].parse() {
                return Directive::ResourceIncrease {
                    name: caps[1].to_string(),
                    amount,
                };
            }
        }

        if let Some(caps) = SET_RESOURCE.captures(raw) {
            if let Ok(amount) = caps[2].parse() {
                return Directive::ResourceSet {
                    name: caps[1].to_string(),
                    amount,
                };
            }
        }

        if let Some(caps) = UPDATE_STATUS.captures(raw) {
            return Directive::StatusUpdate {
                text: caps[1].trim().to_string(),
            };
        }

        if let Some(caps) = UPDATE_FAMILY.captures(raw) {
            return Directive::FamilyUpdate {
                member: caps[1].trim().to_string(),
                status: caps[2].trim().to_string(),
            };
        }

        if let Some(caps) = ADD_ITEM.captures(raw) {
            return Directive::ListAppend {
                category: caps[1].to_string(),
                value: caps[2].trim().to_string(),
            };
        }

        if let Some(caps) = SET_KEY_PATH.captures(raw) {
            return Directive::KeyPathSet {
                path: caps[1].split('.').map(str::to_string).collect(),
                value: caps[2].to_string(),
            };
        }

        Directive::Unrecognized {
            raw: raw.to_string(),
        }
    }

    /// Apply this directive to the state. Best-effort; never fails.
    pub fn apply(&self, state: &mut SessionState) {
        match self {
            Directive::ResourceDecrease { name, amount } => {
                state.decrease_resource(name, *amount);
            }
            Directive::ResourceIncrease { name, amount } => {
                state.increase_resource(name, *amount);
            }
            Directive::ResourceSet { name, amount } => {
                state.set_resource(name, *amount);
            }
            Directive::StatusUpdate { text } => {
                state.set_status(text.clone());
            }
            Directive::FamilyUpdate { member, status } => {
                state.set_family_status(member, status);
            }
            Directive::ListAppend { category, value } => {
                state.append_to_list(category, value);
            }
            Directive::KeyPathSet { path, value } => {
                state.set_path(path, coerce_value(value));
            }
            Directive::Unrecognized { raw } => {
                debug!(directive = %raw, "no pattern matched; directive dropped");
            }
        }
    }
}

/// Classify and apply one raw directive line.
pub fn apply_directive(state: &mut SessionState, raw: &str) {
    let directive = Directive::classify(raw);
    debug!(?directive, "applying directive");
    directive.apply(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_with_resources() -> SessionState {
        let mut state = SessionState::new();
        state.set_resource("food", 10);
        state.set_resource("water", 10);
        state
    }

    #[test]
    fn test_classify_decrease() {
        assert_eq!(
            Directive::classify("decrease resources.food by 2"),
            Directive::ResourceDecrease {
                name: "food".to_string(),
                amount: 2
            }
        );
    }

    #[test]
    fn test_classify_is_keyword_case_insensitive() {
        assert_eq!(
            Directive::classify("Increase Resources.water BY 3"),
            Directive::ResourceIncrease {
                name: "water".to_string(),
                amount: 3
            }
        );
    }

    #[test]
    fn test_specific_resource_set_shadows_generic() {
        // Matcher precedence: this must classify as a resource set even
        // though the generic key-path pattern would also match.
        assert_eq!(
            Directive::classify("set resources.food to 5"),
            Directive::ResourceSet {
                name: "food".to_string(),
                amount: 5
            }
        );
    }

    #[test]
    fn test_oversized_amount_falls_through_to_generic() {
        let directive = Directive::classify("set resources.food to 99999999999999999999999");
        assert_eq!(
            directive,
            Directive::KeyPathSet {
                path: vec!["resources".to_string(), "food".to_string()],
                value: "99999999999999999999999".to_string(),
            }
        );

        let mut state = state_with_resources();
        directive.apply(&mut state);
        assert_eq!(
            state.get_path("resources.food"),
            Some(&json!("99999999999999999999999"))
        );
    }

    #[test]
    fn test_classify_status_strips_quotes() {
        assert_eq!(
            Directive::classify("update status to \"Day 2\""),
            Directive::StatusUpdate {
                text: "Day 2".to_string()
            }
        );
    }

    #[test]
    fn test_classify_family_update() {
        assert_eq!(
            Directive::classify("update family member \"John\" to \"injured\""),
            Directive::FamilyUpdate {
                member: "John".to_string(),
                status: "injured".to_string()
            }
        );
    }

    #[test]
    fn test_classify_add() {
        assert_eq!(
            Directive::classify("add injuries \"sprained ankle\""),
            Directive::ListAppend {
                category: "injuries".to_string(),
                value: "sprained ankle".to_string()
            }
        );
    }

    #[test]
    fn test_classify_generic_key_path() {
        assert_eq!(
            Directive::classify("set shelter.location to rooftop"),
            Directive::KeyPathSet {
                path: vec!["shelter".to_string(), "location".to_string()],
                value: "rooftop".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        assert!(matches!(
            Directive::classify("frobnicate the doodad"),
            Directive::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_unrecognized_is_a_no_op() {
        let mut state = state_with_resources();
        let before = state.clone();
        apply_directive(&mut state, "frobnicate the doodad");
        assert_eq!(state, before);
    }

    #[test]
    fn test_decrease_floors_at_zero() {
        let mut state = state_with_resources();
        apply_directive(&mut state, "decrease resources.water by 15");
        assert_eq!(state.resource("water"), Some(0));
    }

    #[test]
    fn test_decrease_of_missing_key_is_dropped() {
        let mut state = state_with_resources();
        apply_directive(&mut state, "decrease resources.fuel by 1");
        assert_eq!(state.resource("fuel"), None);
    }

    #[test]
    fn test_increase_creates_missing_key() {
        let mut state = SessionState::new();
        apply_directive(&mut state, "increase resources.medicine by 2");
        assert_eq!(state.resource("medicine"), Some(2));
    }

    #[test]
    fn test_family_update_applies() {
        let mut state = SessionState::new();
        apply_directive(&mut state, "update family member \"John\" to \"injured\"");
        assert_eq!(
            state.family_status().and_then(|f| f.get("John")),
            Some(&json!("injured"))
        );
    }

    #[test]
    fn test_key_path_round_trip() {
        let mut state = SessionState::new();
        apply_directive(&mut state, "set a.b.c to 5");
        assert_eq!(state.get_path("a.b.c"), Some(&json!(5)));

        apply_directive(&mut state, "set a.b.c to 5.5");
        assert_eq!(state.get_path("a.b.c"), Some(&json!(5.5)));

        apply_directive(&mut state, "set a.b.c to hello");
        assert_eq!(state.get_path("a.b.c"), Some(&json!("hello")));
    }

    #[test]
    fn test_add_then_generic_precedence() {
        // "add" wins over the generic matcher for add-shaped text, and the
        // generic matcher only sees "set ..." directives.
        assert!(matches!(
            Directive::classify("add notes \"remember flashlight\""),
            Directive::ListAppend { .. }
        ));
        assert!(matches!(
            Directive::classify("set notes to empty"),
            Directive::KeyPathSet { .. }
        ));
    }
}
