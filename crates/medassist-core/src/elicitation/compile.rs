//! Compilation of form values into a single natural-language request.

use super::canonical::CanonicalParam;
use super::values::ParameterValues;

/// Ordered (substring, prefix) rules matched against the lowercased intent.
///
/// This is a heuristic over free-form intent labels; the first match wins.
pub const INTENT_RULES: &[(&str, &str)] = &[
    ("diabetes", "Predict diabetes risk: "),
    ("hypertension", "Predict hypertension risk: "),
];

pub const DEFAULT_PREFIX: &str = "Predict risk: ";

pub fn intent_prefix(intent: Option<&str>) -> &'static str {
    let Some(intent) = intent else {
        return DEFAULT_PREFIX;
    };
    let lowered = intent.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, prefix)| *prefix)
        .unwrap_or(DEFAULT_PREFIX)
}

/// Canonical clauses in vocabulary order, then extras as `"name value"`.
pub fn compile_clauses(values: &ParameterValues) -> Vec<String> {
    let canonical = CanonicalParam::ALL.into_iter().filter_map(|param| {
        values
            .canonical_value(param)
            .map(|value| param.phrase(value.trim()))
    });
    let extras = values
        .extras()
        .into_iter()
        .map(|(name, value)| format!("{name} {}", value.trim()));

    canonical.chain(extras).collect()
}

/// Full sentence for `intent`, or `None` when there is nothing to say.
pub fn compile_message(intent: Option<&str>, values: &ParameterValues) -> Option<String> {
    let clauses = compile_clauses(values);
    if clauses.is_empty() {
        return None;
    }
    Some(format!("{}{}", intent_prefix(intent), clauses.join(", ")))
}
