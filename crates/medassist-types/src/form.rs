//! Parameter form schema types.
//!
//! A form is derived from the latest agent metadata whenever the agent is
//! still missing required parameters. These types describe the form for
//! presentation; the derivation itself lives in `medassist-core`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a parameter is collected from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// One of a fixed set of options.
    Choice { options: Vec<String> },
    /// A decimal number.
    Numeric,
    /// Yes or no.
    Binary,
    /// Anything.
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Choice { .. } => write!(f, "choice"),
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Binary => write!(f, "binary"),
            FieldKind::Text => write!(f, "text"),
        }
    }
}

/// One input of the parameter form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterField {
    /// Parameter name exactly as the agent reported it.
    pub name: String,
    /// Human label for the input.
    pub label: String,
    pub kind: FieldKind,
}

/// Presentation snapshot of an active form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub intent: Option<String>,
    pub fields: Vec<ParameterField>,
    /// Current values, keyed by parameter name and its lowercase alias.
    pub values: BTreeMap<String, String>,
}

impl FormView {
    /// Current value for a field, by exact name or lowercase alias.
    pub fn value_for(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .or_else(|| self.values.get(&name.to_lowercase()))
            .map(String::as_str)
    }
}
