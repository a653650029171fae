//! Main consultation loop.
//!
//! Reads lines while watching connectivity, dispatches messages through the
//! shared session, renders replies, and drives the parameter form.

use std::path::Path;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;

use medassist_core::session::{RejectReason, SendOutcome};
use medassist_types::connectivity::ConnectivityState;
use medassist_types::turn::Speaker;

use crate::cli::form::print_form;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::form_entry::{FormEntry, fill_form};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Prompt reflecting the agent's connectivity.
pub fn prompt_for(state: ConnectivityState) -> String {
    let dot = match state {
        ConnectivityState::Up => style("●").green(),
        ConnectivityState::Down => style("●").red(),
        ConnectivityState::Unknown => style("○").dim(),
    };
    format!("  {dot} {} ", style("You >").green().bold())
}

pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("waiting for the agent...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Resolve on the next connectivity change. Never resolves once the
/// monitor is gone.
async fn next_connectivity(
    rx: &mut Option<watch::Receiver<ConnectivityState>>,
) -> ConnectivityState {
    let Some(receiver) = rx.as_mut() else {
        return std::future::pending().await;
    };
    if receiver.changed().await.is_err() {
        *rx = None;
        return std::future::pending().await;
    }
    *receiver.borrow_and_update()
}

/// Run the interactive consultation until the user exits.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let renderer = ChatRenderer::new();
    let mut connectivity = state.monitor.as_ref().map(|monitor| monitor.subscribe());

    print_welcome_banner(state.session.agent_address(), state.connectivity());
    for turn in state.session.turns() {
        renderer.print_agent_reply(&turn.text);
    }

    let mut prompt = prompt_for(state.connectivity());
    let (mut input, _writer) = ChatInput::new(prompt.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let event = tokio::select! {
            event = input.read_line() => event,
            status = next_connectivity(&mut connectivity) => {
                prompt = prompt_for(status);
                input.update_prompt(&prompt);
                continue;
            }
        };

        let text = match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Consultation ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep typing.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        let Some(command) = commands::parse(&text) else {
            let started = Instant::now();
            let spinner = thinking_spinner();
            let outcome = state.session.send(&text).await;
            spinner.finish_and_clear();
            render_outcome(state, &renderer, outcome, started);
            continue;
        };

        match command {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Clear => input.clear(),
            ChatCommand::Exit => {
                println!("\n  {}", style("Consultation ended.").dim());
                break;
            }
            ChatCommand::Form => {
                if state.session.form().is_none() {
                    println!("\n  {}\n", style("The agent is not waiting for any parameters.").dim());
                    continue;
                }
                match fill_form(&mut input, &state.session, &prompt).await {
                    FormEntry::Ready => submit_form(state, &renderer).await,
                    FormEntry::Cancelled => {
                        println!("\n  {}\n", style("Form dismissed.").dim());
                    }
                    FormEntry::Abandoned => {
                        println!("\n  {}\n", style("Form left open. Type /form to continue.").dim());
                    }
                }
            }
            ChatCommand::Cancel => {
                if state.session.cancel_form() {
                    println!("\n  {}\n", style("Form dismissed.").dim());
                } else {
                    println!("\n  {}\n", style("No form is open.").dim());
                }
            }
            ChatCommand::Attach(path) => {
                let name = Path::new(&path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or(path);
                match state.session.attach(&name) {
                    Ok(()) => {
                        if let Some(ack) = state.session.turns().last() {
                            renderer.print_agent_reply(&ack.text);
                        }
                    }
                    Err(reason) => println!("\n  {} {reason}\n", style("!").yellow().bold()),
                }
            }
            ChatCommand::Status => print_status(state),
            ChatCommand::History => print_history(state),
            ChatCommand::Result => match state.session.latest_model_result() {
                Some(result) => {
                    println!();
                    println!("  {}", style("Latest model result").bold());
                    print!("{}", renderer.render_json(&result));
                    println!();
                }
                None => println!("\n  {}\n", style("No model result yet.").dim()),
            },
            ChatCommand::Unknown(name) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                );
            }
        }
    }

    input.flush();
    state.shutdown();
    Ok(())
}

async fn submit_form(state: &AppState, renderer: &ChatRenderer) {
    let started = Instant::now();
    let spinner = thinking_spinner();
    let result = state.session.submit_form().await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if let Some(sent) = state
                .session
                .turns()
                .iter()
                .rev()
                .find(|turn| turn.speaker == Speaker::User)
            {
                println!("\n  {} {}", style("Sent:").dim(), sent.text);
            }
            render_outcome(state, renderer, outcome, started);
        }
        Err(err) => println!("\n  {} {err}\n", style("!").yellow().bold()),
    }
}

fn render_outcome(
    state: &AppState,
    renderer: &ChatRenderer,
    outcome: SendOutcome,
    started: Instant,
) {
    match outcome {
        SendOutcome::Rejected {
            reason: RejectReason::Busy,
        } => {
            println!("\n  {}\n", style("Still waiting for the previous reply.").yellow());
        }
        SendOutcome::Rejected {
            reason: RejectReason::Empty,
        } => {}
        SendOutcome::Delivered {
            route,
            failover_warning,
        } => {
            if let Some(warning) = failover_warning {
                println!("\n  {} {}", style("!").yellow().bold(), style(warning).dim());
            }
            if let Some(reply) = state.session.turns().last() {
                renderer.print_agent_reply(&reply.text);
            }
            renderer.print_reply_footer(
                route,
                started.elapsed().as_millis() as u64,
                state.connectivity(),
            );
            if let Some(form) = state.session.form() {
                print_form(&form);
                println!("  {}\n", style("Type /form to fill these in.").dim());
            }
        }
        SendOutcome::Failed { .. } => {
            if let Some(error_turn) = state.session.turns().last() {
                println!("\n  {} {}\n", style("!").red().bold(), error_turn.text);
            }
        }
    }
}

fn print_status(state: &AppState) {
    let connectivity = state.connectivity();
    let status = match connectivity {
        ConnectivityState::Up => style(connectivity.label()).green(),
        ConnectivityState::Down => style(connectivity.label()).red(),
        ConnectivityState::Unknown => style(connectivity.label()).dim(),
    };

    println!();
    println!("  {}   {}", style("Agent:").bold(), state.session.agent_address());
    println!("  {}  {}", style("Status:").bold(), status);
    println!("  {}   {}", style("Turns:").bold(), state.session.turns().len());
    match state.session.form() {
        Some(form) => {
            let missing = form
                .fields
                .iter()
                .filter(|field| form.value_for(&field.name).is_none())
                .count();
            println!(
                "  {}    {} field(s), {} missing",
                style("Form:").bold(),
                form.fields.len(),
                missing
            );
        }
        None => println!("  {}    {}", style("Form:").bold(), style("none").dim()),
    }
    println!();
}

fn print_history(state: &AppState) {
    println!();
    for turn in state.session.turns() {
        let label = match turn.speaker {
            Speaker::User => style("You").green().bold(),
            Speaker::Agent => style("Agent").cyan().bold(),
        };
        let preview: String = turn.text.chars().take(100).collect();
        let ellipsis = if turn.text.chars().count() > 100 { "..." } else { "" };
        println!(
            "  {} {} {preview}{ellipsis}",
            style(turn.created_at.format("%H:%M:%S")).dim(),
            label
        );
    }
    println!();
}
