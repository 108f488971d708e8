//! Semi-structured session state.
//!
//! The simulation state is a JSON object tree: a handful of well-known keys
//! (`profile`, `resources`, `status`, `family_status`) plus whatever nested
//! keys the model's directives introduce over the course of a run. This
//! module wraps that tree in a newtype whose accessors enforce the two
//! invariants the interpreter relies on: resource quantities never go
//! negative, and mappings are created lazily on first mutation reference.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The mutable state of one simulation run.
///
/// Owned exclusively by the session that is running the simulation; the
/// directive interpreter receives it by `&mut` and mutates in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState(Map<String, Value>);

impl SessionState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// View the state as a JSON value, for prompt embedding and transport.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Read a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Write a top-level key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Remove a top-level key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// Current quantity of a resource, if the resource exists and is numeric.
    pub fn resource(&self, name: &str) -> Option<i64> {
        self.0
            .get("resources")
            .and_then(Value::as_object)
            .and_then(|r| r.get(name))
            .and_then(Value::as_i64)
    }

    /// Resource quantity with a default for absent entries.
    ///
    /// Absent food/water is treated as "ok" by the end-of-simulation check,
    /// hence the caller-supplied default rather than zero.
    pub fn resource_or(&self, name: &str, default: i64) -> i64 {
        self.resource(name).unwrap_or(default)
    }

    /// Subtract from an existing resource, flooring at zero.
    ///
    /// Does nothing when the resource key does not exist or holds a
    /// non-numeric value; a decrease never creates a resource.
    pub fn decrease_resource(&mut self, name: &str, amount: i64) {
        let Some(current) = self.resource(name) else {
            return;
        };
        self.write_resource(name, (current - amount).max(0));
    }

    /// Add to a resource, creating it with `amount` when absent.
    ///
    /// An existing non-numeric value is left untouched.
    pub fn increase_resource(&mut self, name: &str, amount: i64) {
        let resources = self.resources_mut();
        match resources.get(name).map(Value::as_i64) {
            // Key absent: created with the increment as its value.
            None => {
                resources.insert(name.to_string(), Value::from(amount.max(0)));
            }
            Some(Some(current)) => {
                resources.insert(name.to_string(), Value::from((current + amount).max(0)));
            }
            // Key present but not numeric: left untouched.
            Some(None) => {}
        }
    }

    /// Set a resource unconditionally, creating the mapping if needed.
    pub fn set_resource(&mut self, name: &str, amount: i64) {
        self.write_resource(name, amount.max(0));
    }

    fn write_resource(&mut self, name: &str, amount: i64) {
        self.resources_mut()
            .insert(name.to_string(), Value::from(amount));
    }

    fn resources_mut(&mut self) -> &mut Map<String, Value> {
        let entry = self
            .0
            .entry("resources".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        entry.as_object_mut().expect("resources is an object")
    }

    // ------------------------------------------------------------------
    // Status & family
    // ------------------------------------------------------------------

    /// The free-text status label, e.g. `"Day 3"`.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.0.insert("status".to_string(), Value::String(text.into()));
    }

    /// Day number embedded in the status label, when it matches `Day <N>`.
    pub fn status_day(&self) -> Option<u32> {
        let status = self.status()?;
        let rest = status.split("Day ").nth(1)?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Record a family member's status, creating the mapping if needed.
    pub fn set_family_status(&mut self, member: &str, status: &str) {
        let entry = self
            .0
            .entry("family_status".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(family) = entry.as_object_mut() {
            family.insert(member.to_string(), Value::String(status.to_string()));
        }
    }

    /// Family status mapping, when present.
    pub fn family_status(&self) -> Option<&Map<String, Value>> {
        self.0.get("family_status").and_then(Value::as_object)
    }

    // ------------------------------------------------------------------
    // Generic mutations
    // ------------------------------------------------------------------

    /// Append to the sequence stored under `category`.
    ///
    /// Creates an empty sequence when the key is new; when the key holds
    /// anything other than a sequence the append is dropped.
    pub fn append_to_list(&mut self, category: &str, value: &str) {
        let entry = self
            .0
            .entry(category.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Some(list) = entry.as_array_mut() {
            list.push(Value::String(value.to_string()));
        }
    }

    /// Set a leaf along a dotted key path, creating intermediate mappings.
    ///
    /// When an intermediate segment already holds a non-mapping value the
    /// write is dropped rather than clobbering it.
    pub fn set_path(&mut self, segments: &[String], value: Value) {
        let Some((leaf, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry.as_object_mut() {
                Some(map) => current = map,
                None => return,
            }
        }
        current.insert(leaf.clone(), value);
    }

    /// Read a leaf along a dotted key path.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current: &Value = self.0.get(path.split('.').next()?)?;
        for segment in path.split('.').skip(1) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

/// Coerce a captured directive value into a typed JSON value.
///
/// All-digits text becomes an integer, text with a single decimal point and
/// digits elsewhere becomes a float, anything else (including digit strings
/// too large for an integer) is stored as the raw string.
pub fn coerce_value(text: &str) -> Value {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = text.parse::<i64>() {
            return Value::from(n);
        }
        return Value::String(text.to_string());
    }

    let without_point = text.replacen('.', "", 1);
    if text.matches('.').count() == 1
        && !without_point.is_empty()
        && without_point.chars().all(|c| c.is_ascii_digit())
    {
        if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(text.to_string())
}
