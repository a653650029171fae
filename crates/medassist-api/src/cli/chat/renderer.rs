//! Terminal rendering of agent replies and model results.
//!
//! Reply prose goes through `termimad`; fenced blocks and the JSON model
//! result are highlighted with `syntect`.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use medassist_types::agent::ChatRoute;
use medassist_types::connectivity::ConnectivityState;

const THEME: &str = "base16-ocean.dark";

/// A piece of an agent reply.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Prose(&'a str),
    Fence { lang: &'a str, body: String },
}

/// Split a reply into prose lines and fenced blocks. An unclosed fence runs
/// to the end of the reply.
fn segments(markdown: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut open: Option<(&str, String)> = None;

    for line in markdown.lines() {
        let fence = line.strip_prefix("```");
        match (open.take(), fence) {
            (None, Some(lang)) => open = Some((lang.trim(), String::new())),
            (None, None) => out.push(Segment::Prose(line)),
            (Some((lang, body)), Some(_)) => out.push(Segment::Fence { lang, body }),
            (Some((lang, mut body)), None) => {
                body.push_str(line);
                body.push('\n');
                open = Some((lang, body));
            }
        }
    }

    if let Some((lang, body)) = open.filter(|(_, body)| !body.is_empty()) {
        out.push(Segment::Fence { lang, body });
    }
    out
}

/// Renders agent replies for the terminal.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.italic.set_fg(Color::Grey);
        for header in skin.headers.iter_mut().take(2) {
            header.set_fg(Color::Cyan);
        }
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a reply as markdown, highlighting fenced blocks.
    pub fn render_markdown(&self, markdown: &str) -> String {
        segments(markdown)
            .into_iter()
            .map(|segment| match segment {
                Segment::Prose(line) => self.skin.term_text(line).to_string(),
                Segment::Fence { lang, body } => self.highlight(&body, lang),
            })
            .collect()
    }

    /// Pretty-print and highlight a JSON value.
    pub fn render_json(&self, value: &serde_json::Value) -> String {
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        self.highlight(&pretty, "json")
    }

    /// Print one agent reply with its speaker label.
    pub fn print_agent_reply(&self, text: &str) {
        println!();
        println!("  {}", console::style("Agent").cyan().bold());
        for line in self.render_markdown(text).trim_end().lines() {
            println!("  {line}");
        }
        println!();
    }

    /// Print the footer under a reply: route, latency, connectivity.
    pub fn print_reply_footer(
        &self,
        route: ChatRoute,
        response_ms: u64,
        connectivity: ConnectivityState,
    ) {
        let dot = console::style("\u{00b7}").dim();
        println!(
            "  {} via {} {dot} {:.1}s {dot} agent {}",
            console::style("|").dim(),
            console::style(route).dim(),
            response_ms as f64 / 1000.0,
            console::style(connectivity.label()).dim(),
        );
        println!();
    }

    fn highlight(&self, code: &str, lang: &str) -> String {
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, theme);

        code.lines()
            .map(|line| {
                let ranges: Vec<(Style, &str)> = highlighter
                    .highlight_line(line, &self.syntax_set)
                    .unwrap_or_default();
                format!("  {}\x1b[0m\n", as_24_bit_terminal_escaped(&ranges, false))
            })
            .collect()
    }
}
