//! Parameter values collected for the open form.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::canonical::CanonicalParam;

/// Map of parameter name to string value.
///
/// Every write stores the value under the name as given and under its
/// lowercase alias. Writing a canonical parameter replaces any value stored
/// under another alias of the same parameter, so one fact has one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterValues {
    values: BTreeMap<String, String>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed values from the agent's extracted data.
    pub fn from_extracted(extracted: &Map<String, Value>) -> Self {
        let mut values = Self::new();
        for (name, value) in extracted {
            if let Some(text) = stringify(value) {
                values.insert(name, &text);
            }
        }
        values
    }

    /// Store `value` under `name`. A blank value clears the parameter.
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        match CanonicalParam::from_name(name) {
            Some(param) => self
                .values
                .retain(|key, _| CanonicalParam::from_name(key) != Some(param)),
            None => {
                let lowered = name.to_lowercase();
                self.values.retain(|key, _| key.to_lowercase() != lowered);
            }
        }

        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.values.insert(name.to_string(), value.to_string());
        self.values.insert(name.to_lowercase(), value.to_string());
    }

    /// Layer `known` on top of `self`; values in `known` win.
    pub fn overlay(mut self, known: &ParameterValues) -> Self {
        for (name, value) in known.entries().into_values() {
            self.insert(name, value);
        }
        self
    }

    /// Value for a parameter name, resolving canonical aliases.
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(param) = CanonicalParam::from_name(name) {
            return self.canonical_value(param);
        }
        self.values
            .get(name)
            .or_else(|| self.values.get(&name.to_lowercase()))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// First non-blank value stored under any alias of `param`.
    pub fn canonical_value(&self, param: CanonicalParam) -> Option<&str> {
        self.values
            .iter()
            .filter(|(key, _)| CanonicalParam::from_name(key) == Some(param))
            .map(|(_, value)| value.as_str())
            .find(|value| !value.trim().is_empty())
    }

    /// Non-canonical entries, one per lowercase name, in lowercase-name order.
    ///
    /// Each entry keeps the first spelling that carries a non-blank value.
    pub fn extras(&self) -> Vec<(&str, &str)> {
        self.entries()
            .into_iter()
            .filter(|(key, _)| matches!(key, ParamKey::Extra(_)))
            .map(|(_, entry)| entry)
            .collect()
    }

    /// One non-blank entry per parameter, keeping the first spelling.
    fn entries(&self) -> BTreeMap<ParamKey, (&str, &str)> {
        let mut grouped = BTreeMap::new();
        for (key, value) in &self.values {
            if value.trim().is_empty() {
                continue;
            }
            grouped
                .entry(ParamKey::of(key))
                .or_insert((key.as_str(), value.as_str()));
        }
        grouped
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Identity of a stored name: its canonical parameter, or its lowercase form.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ParamKey {
    Canonical(CanonicalParam),
    Extra(String),
}

impl ParamKey {
    fn of(name: &str) -> Self {
        match CanonicalParam::from_name(name) {
            Some(param) => ParamKey::Canonical(param),
            None => ParamKey::Extra(name.to_lowercase()),
        }
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(if *flag { "yes" } else { "no" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
