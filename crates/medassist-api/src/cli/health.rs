//! One-off agent health probe.

use anyhow::Result;
use console::style;

use medassist_core::monitor::probe;
use medassist_types::connectivity::ConnectivityState;

use crate::state::AppState;

/// Probe the agent once and report the result.
///
/// Returns an error when the agent is down so scripts can check the exit code.
pub async fn check_health(state: &AppState, json: bool) -> Result<()> {
    let status = probe(&state.transport, state.config.monitor.probe_timeout()).await;

    if json {
        let payload = serde_json::json!({
            "agent": state.transport.base_url(),
            "status": status,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let mark = match status {
            ConnectivityState::Up => style("✓").green(),
            _ => style("✗").red(),
        };
        println!();
        println!(
            "  {} {} ({})",
            mark,
            status.label(),
            style(state.transport.base_url()).dim()
        );
        println!();
    }

    if status != ConnectivityState::Up {
        anyhow::bail!("agent at {} is unreachable", state.transport.base_url());
    }
    Ok(())
}
