//! Field-by-field entry of the parameter form at the chat prompt.

use console::style;

use medassist_core::session::ConsultationSession;
use medassist_types::error::FormError;
use medassist_types::form::ParameterField;

use super::input::{ChatInput, InputEvent};
use crate::cli::form::kind_hint;

/// How a form entry pass ended.
#[derive(Debug, PartialEq, Eq)]
pub enum FormEntry {
    /// Every field was visited; the form can be submitted.
    Ready,
    /// The user dismissed the form with `/cancel`.
    Cancelled,
    /// Input ended early; the form stays open with what was entered.
    Abandoned,
}

/// Prompt shown for one field, including its current value.
pub fn field_prompt(field: &ParameterField, current: Option<&str>) -> String {
    let current = current
        .map(|value| format!(" [{}]", style(value).green()))
        .unwrap_or_default();
    format!(
        "  {}{} {} ",
        style(&field.label).cyan().bold(),
        current,
        style(format!("({}) >", kind_hint(&field.kind))).dim()
    )
}

/// Value currently held for `name`, read from the live form.
fn current_value(session: &ConsultationSession, name: &str) -> Option<String> {
    session
        .form()
        .and_then(|form| form.value_for(name).map(str::to_string))
}

/// Walk every field of the open form. Enter keeps the current value.
pub async fn fill_form(
    input: &mut ChatInput,
    session: &ConsultationSession,
    base_prompt: &str,
) -> FormEntry {
    let Some(fields) = session.form().map(|form| form.fields) else {
        return FormEntry::Abandoned;
    };

    println!(
        "  {}",
        style("Press Enter to keep a value, /cancel to dismiss the form.").dim()
    );

    let outcome = 'fields: {
        for field in &fields {
            loop {
                let current = current_value(session, &field.name);
                input.update_prompt(&field_prompt(field, current.as_deref()));
                let text = match input.read_line().await {
                    InputEvent::Message(text) => text,
                    InputEvent::Eof | InputEvent::Interrupted => break 'fields FormEntry::Abandoned,
                };

                if text.is_empty() {
                    break;
                }
                if text.eq_ignore_ascii_case("/cancel") {
                    session.cancel_form();
                    break 'fields FormEntry::Cancelled;
                }

                match session.set_form_value(&field.name, &text) {
                    Ok(()) => break,
                    Err(FormError::InvalidValue { reason, .. }) => {
                        println!("  {} {reason}", style("!").yellow().bold());
                    }
                    Err(err) => {
                        println!("  {} {err}", style("!").red().bold());
                        break 'fields FormEntry::Abandoned;
                    }
                }
            }
        }
        FormEntry::Ready
    };

    input.update_prompt(base_prompt);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_types::form::FieldKind;

    use crate::testing::stub_state;

    #[test]
    fn test_field_prompt_shows_current_value_and_hint() {
        let field = ParameterField {
            name: "bmi".to_string(),
            label: "BMI".to_string(),
            kind: FieldKind::Numeric,
        };
        let prompt = console::strip_ansi_codes(&field_prompt(&field, Some("27.5"))).to_string();
        assert_eq!(prompt, "  BMI [27.5] (number) > ");

        let empty = console::strip_ansi_codes(&field_prompt(&field, None)).to_string();
        assert_eq!(empty, "  BMI (number) > ");
    }

    #[tokio::test]
    async fn test_current_value_follows_session_edits() {
        let state = stub_state();
        state.session.send("check my diabetes risk").await;
        assert_eq!(current_value(&state.session, "age"), None);

        state.session.set_form_value("age", "52").unwrap();
        assert_eq!(current_value(&state.session, "age").as_deref(), Some("52"));

        state.session.set_form_value("age", "53").unwrap();
        assert_eq!(current_value(&state.session, "age").as_deref(), Some("53"));

        state.session.cancel_form();
        assert_eq!(current_value(&state.session, "age"), None);
    }
}
