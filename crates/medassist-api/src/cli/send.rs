//! One-shot message dispatch.

use std::time::Instant;

use anyhow::Result;
use console::style;

use medassist_core::session::SendOutcome;

use crate::cli::chat::loop_runner::thinking_spinner;
use crate::cli::chat::renderer::ChatRenderer;
use crate::cli::form::print_form;
use crate::state::AppState;

/// Send `message`, print the reply and any requested parameters.
///
/// Exits with an error when the agent could not be reached.
pub async fn send_message(state: &AppState, message: &str, json: bool, quiet: bool) -> Result<()> {
    let started = Instant::now();
    let spinner = (!json && !quiet).then(thinking_spinner);
    let outcome = state.session.send(message).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let turns = state.session.turns();
        let payload = serde_json::json!({
            "outcome": outcome,
            "reply": turns.last().map(|turn| turn.text.clone()),
            "metadata": turns.last().and_then(|turn| turn.metadata.clone()),
            "form": state.session.form(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match &outcome {
            SendOutcome::Rejected { reason } => {
                anyhow::bail!("message not sent: {reason}");
            }
            SendOutcome::Delivered {
                route,
                failover_warning,
            } => {
                if let Some(warning) = failover_warning {
                    eprintln!("  {} {}", style("!").yellow().bold(), style(warning).dim());
                }
                let renderer = ChatRenderer::new();
                if let Some(reply) = state.session.turns().last() {
                    renderer.print_agent_reply(&reply.text);
                }
                if !quiet {
                    renderer.print_reply_footer(
                        *route,
                        started.elapsed().as_millis() as u64,
                        state.connectivity(),
                    );
                }
                if let Some(form) = state.session.form() {
                    print_form(&form);
                }
                if let Some(result) = state.session.latest_model_result() {
                    println!("  {}", style("Model result").bold());
                    print!("{}", renderer.render_json(&result));
                    println!();
                }
            }
            SendOutcome::Failed { .. } => {}
        }
    }

    match outcome {
        SendOutcome::Failed { reason } => anyhow::bail!(
            "could not reach the agent at {}: {reason}",
            state.session.agent_address()
        ),
        SendOutcome::Rejected { reason } if json => anyhow::bail!("message not sent: {reason}"),
        _ => Ok(()),
    }
}
