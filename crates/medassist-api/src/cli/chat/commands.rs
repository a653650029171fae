//! Slash command parsing for the consultation loop.

use console::style;

/// Available slash commands.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Fill in the open parameter form field by field.
    Form,
    /// Close the open parameter form.
    Cancel,
    /// Record a dropped file by path.
    Attach(String),
    /// Show connectivity and form state.
    Status,
    /// Show the transcript so far.
    History,
    /// Show the latest model result.
    Result,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/form" | "/f" => ChatCommand::Form,
        "/cancel" => ChatCommand::Cancel,
        "/attach" | "/a" if arg.is_empty() => {
            ChatCommand::Unknown("/attach requires a file path".to_string())
        }
        "/attach" | "/a" => ChatCommand::Attach(arg.to_string()),
        "/status" => ChatCommand::Status,
        "/history" => ChatCommand::History,
        "/result" => ChatCommand::Result,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the consultation"),
        ("/form", "Fill in the parameters the agent asked for"),
        ("/cancel", "Dismiss the parameter form"),
        ("/attach <path>", "Attach a file to the consultation"),
        ("/status", "Show agent connectivity and form state"),
        ("/history", "Show the conversation so far"),
        ("/result", "Show the latest model result"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in rows {
        println!("  {} {description}", style(format!("{name:<16}")).cyan());
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+D to exit, Ctrl+C clears the current line").dim()
    );
    println!();
}
