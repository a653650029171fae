//! MedAssist CLI and REST API entry point.
//!
//! Binary name: `medassist`
//!
//! Parses CLI arguments, loads configuration, builds the agent client, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;
#[cfg(test)]
mod testing;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "medassist", &mut std::io::stdout());
        return Ok(());
    }

    let filter = medassist_observe::tracing_setup::verbosity_filter(cli.verbose, cli.quiet);
    medassist_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;

    medassist_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = medassist_infra::config::load_client_config(cli.config.as_deref()).await?;
    if let Some(url) = cli.agent_url {
        config.agent.base_url = url;
    }

    let state = AppState::init(config)?;

    match cli.command {
        Commands::Chat => {
            let state = state.with_monitor();
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::Send { message } => {
            cli::send::send_message(&state, &message.join(" "), cli.json, cli.quiet).await?;
        }

        Commands::Health => {
            cli::health::check_health(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let state = state.with_monitor();
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} MedAssist API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {} {}",
                console::style("Agent:").dim(),
                console::style(state.transport.base_url()).dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state.clone());

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            state.shutdown();
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
