//! Form field inference and input normalization.

use medassist_types::form::{FieldKind, ParameterField};

use super::canonical::{CanonicalParam, parse_flag};

/// Build the form field for a requested parameter name.
///
/// Unrecognized names become free-text fields labelled from the name itself.
pub fn build_field(name: &str) -> ParameterField {
    match CanonicalParam::from_name(name) {
        Some(param) => ParameterField {
            name: name.to_string(),
            label: param.label().to_string(),
            kind: param.field_kind(),
        },
        None => ParameterField {
            name: name.to_string(),
            label: humanize(name),
            kind: FieldKind::Text,
        },
    }
}

/// Validate `raw` against `kind` and return the value to store.
///
/// Blank input is always accepted and normalizes to an empty string.
pub fn normalize_value(kind: &FieldKind, raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    match kind {
        FieldKind::Text => Ok(value.to_string()),
        FieldKind::Numeric => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(value.to_string()),
            _ => Err(format!("expected a number, got '{value}'")),
        },
        FieldKind::Binary => match parse_flag(value) {
            Some(true) => Ok("yes".to_string()),
            Some(false) => Ok("no".to_string()),
            None => Err(format!("expected yes or no, got '{value}'")),
        },
        FieldKind::Choice { options } => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(value))
            .cloned()
            .ok_or_else(|| format!("expected one of: {}", options.join(", "))),
    }
}

fn humanize(name: &str) -> String {
    let spaced = name.trim().replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
