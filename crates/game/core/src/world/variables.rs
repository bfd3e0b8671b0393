use std::collections::BTreeMap;

use crate::error::ScriptError;

/// Game-variable store: string keys to string values.
///
/// Scripts treat values as text; numeric helpers parse on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Parses the variable `key` as a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Resolves a script token that is either a numeric literal or a variable name.
    ///
    /// Unset variables count as `0`, matching how fresh counters behave in scripts.
    pub fn number_or_variable(&self, token: &str) -> Result<f64, ScriptError> {
        let token = token.trim();
        if let Ok(value) = token.parse::<f64>() {
            return Ok(value);
        }
        match self.get(token) {
            None => Ok(0.0),
            Some(raw) => raw.trim().parse().map_err(|_| ScriptError::NotANumber {
                variable: token.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Stores a number, writing whole values without a fractional part.
    pub fn set_number(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, format_number(value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
