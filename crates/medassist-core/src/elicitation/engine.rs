//! Idle/Collecting state machine for missing-parameter forms.

use std::collections::HashSet;

use medassist_types::agent::AgentMetadata;
use medassist_types::error::FormError;
use medassist_types::form::{FieldKind, FormView, ParameterField};

use super::canonical::CanonicalParam;
use super::compile::compile_message;
use super::field::{build_field, normalize_value};
use super::values::ParameterValues;

#[derive(Debug, Clone)]
struct Form {
    intent: Option<String>,
    fields: Vec<ParameterField>,
    values: ParameterValues,
}

impl Form {
    /// Kind of the form field matching `name`, else inferred from the name.
    fn kind_of(&self, name: &str) -> FieldKind {
        self.fields
            .iter()
            .find(|field| same_parameter(&field.name, name))
            .map(|field| field.kind.clone())
            .unwrap_or_else(|| build_field(name).kind)
    }
}

#[derive(Debug, Clone, Default)]
enum EngineState {
    #[default]
    Idle,
    Collecting(Form),
}

/// Derives a form from the latest agent metadata and compiles it back into
/// a user message.
#[derive(Debug, Clone, Default)]
pub struct ElicitationEngine {
    state: EngineState,
}

impl ElicitationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate against the latest agent metadata.
    ///
    /// Enters (or refreshes) Collecting when parameters are still required,
    /// keeping values the user already supplied. Otherwise returns to Idle
    /// and discards the values.
    pub fn observe(&mut self, metadata: Option<&AgentMetadata>) {
        let Some(metadata) = metadata.filter(|m| m.needs_parameters()) else {
            if self.is_collecting() {
                tracing::debug!("Agent no longer requires parameters, closing form");
            }
            self.state = EngineState::Idle;
            return;
        };

        let known = match &self.state {
            EngineState::Collecting(form) => form.values.clone(),
            EngineState::Idle => ParameterValues::new(),
        };
        let values = ParameterValues::from_extracted(&metadata.extracted_data).overlay(&known);
        let fields = fields_for(&metadata.required_params);

        tracing::debug!(
            intent = ?metadata.intent,
            fields = fields.len(),
            "Collecting missing parameters"
        );

        self.state = EngineState::Collecting(Form {
            intent: metadata.intent.clone(),
            fields,
            values,
        });
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, EngineState::Collecting(_))
    }

    /// Current form for rendering, with each field's resolved value.
    pub fn view(&self) -> Option<FormView> {
        let EngineState::Collecting(form) = &self.state else {
            return None;
        };

        let mut values = form.values.as_map().clone();
        for field in &form.fields {
            if let Some(value) = form.values.get(&field.name) {
                values.insert(field.name.clone(), value.to_string());
            }
        }

        Some(FormView {
            intent: form.intent.clone(),
            fields: form.fields.clone(),
            values,
        })
    }

    /// Validate and store a value. Names outside the form are kept as text.
    pub fn set_value(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        self.set_values([(name, raw)])
    }

    /// Validate every value, then store them all. Nothing is stored if any
    /// value is invalid.
    pub fn set_values<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), FormError> {
        let EngineState::Collecting(form) = &mut self.state else {
            return Err(FormError::NotCollecting);
        };

        let normalized = entries
            .into_iter()
            .map(|(name, raw)| {
                normalize_value(&form.kind_of(name), raw)
                    .map(|value| (name, value))
                    .map_err(|reason| FormError::InvalidValue {
                        name: name.to_string(),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (name, value) in normalized {
            form.values.insert(name, &value);
        }
        Ok(())
    }

    /// Close the form. Returns whether one was open.
    pub fn cancel(&mut self) -> bool {
        let was_collecting = self.is_collecting();
        self.state = EngineState::Idle;
        was_collecting
    }

    /// Compile the current values into the message to dispatch.
    pub fn compile(&self) -> Result<String, FormError> {
        let EngineState::Collecting(form) = &self.state else {
            return Err(FormError::NotCollecting);
        };
        compile_message(form.intent.as_deref(), &form.values).ok_or(FormError::NothingToSubmit)
    }
}

fn fields_for(required: &[String]) -> Vec<ParameterField> {
    let mut seen = HashSet::new();
    required
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(build_field)
        .collect()
}

fn same_parameter(a: &str, b: &str) -> bool {
    match (CanonicalParam::from_name(a), CanonicalParam::from_name(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.eq_ignore_ascii_case(b),
    }
}
