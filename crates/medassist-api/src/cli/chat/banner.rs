//! Welcome banner for consultation sessions.

use console::style;

use medassist_types::connectivity::ConnectivityState;

/// Print the banner shown when a consultation starts.
pub fn print_welcome_banner(agent_url: &str, connectivity: ConnectivityState) {
    println!();
    println!(
        "  {} {}",
        style("+").green().bold(),
        style("MedAssist consultation").cyan().bold()
    );
    println!(
        "  {}",
        style("Describe the case; the agent will ask for anything it still needs.").dim()
    );
    println!();
    println!("  {}  {}", style("Agent:").bold(), style(agent_url).dim());
    println!(
        "  {} {}",
        style("Status:").bold(),
        style(connectivity.label()).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
