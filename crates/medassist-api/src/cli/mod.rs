//! CLI command definitions for the `medassist` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod form;
pub mod health;
pub mod send;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Talk to the MedAssist consultation agent.
#[derive(Parser)]
#[command(name = "medassist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to load instead of ~/.medassist/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Agent service base URL (overrides the config file).
    #[arg(long, global = true, env = "MEDASSIST_AGENT_URL", value_name = "URL")]
    pub agent_url: Option<String>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive consultation.
    Chat,

    /// Send one message and print the agent's reply.
    Send {
        /// Message text (joined with spaces).
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Probe the agent's health endpoint once.
    Health,

    /// Serve the consultation over a REST API.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
