//! Context passed to status behaviours during a sweep.
//!
//! The `TickContext` carries the tick number plus whatever game state the
//! scheduler wants behaviours to see (combat state, zone, weather, ...).
//! The engine does not interpret the data; it's passed through to
//! [`StatusBehavior`](crate::behavior::StatusBehavior) hooks.

use crate::error::StatusError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Context information for one sweep.
///
/// # Examples
///
/// ```rust
/// use zzstatus::TickContext;
///
/// let mut tick = TickContext::new(12);
/// tick.set("in_combat", true);
/// tick.set("zone_type", "swamp");
///
/// assert_eq!(tick.tick(), 12);
/// let in_combat: Option<bool> = tick.get("in_combat");
/// assert_eq!(in_combat, Some(true));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickContext {
    tick: u64,
    /// Generic key-value pairs for context data.
    data: HashMap<String, Value>,
}

impl TickContext {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            data: HashMap::new(),
        }
    }

    /// The external scheduler's tick counter.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Set a context value.
    ///
    /// The value must be serializable. If serialization fails, the value
    /// is silently not added.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
    }

    /// Get a context value.
    ///
    /// Returns `None` if the key doesn't exist or if the value
    /// cannot be deserialized to the requested type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(|v| T::deserialize(v).ok())
    }

    /// Get a context value, reporting a present value of the wrong type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzstatus::{StatusError, TickContext};
    ///
    /// let mut tick = TickContext::new(0);
    /// tick.set("difficulty", "hard");
    ///
    /// assert_eq!(tick.require::<String>("difficulty"), Ok(Some("hard".to_string())));
    /// assert_eq!(tick.require::<u32>("missing"), Ok(None));
    /// assert!(matches!(
    ///     tick.require::<u32>("difficulty"),
    ///     Err(StatusError::TypeMismatch { .. })
    /// ));
    /// ```
    pub fn require<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StatusError> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|_| StatusError::TypeMismatch {
                    subject: format!("tick context key {key}"),
                    expected: std::any::type_name::<T>(),
                    found: json_kind(value),
                }),
        }
    }

    /// Check if a key exists in the context.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
