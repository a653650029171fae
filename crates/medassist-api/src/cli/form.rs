//! Terminal rendering of the missing-parameter form.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use medassist_types::form::{FieldKind, FormView};

/// Short description of what a field accepts.
pub fn kind_hint(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Choice { options } => options.join(" / "),
        FieldKind::Numeric => "number".to_string(),
        FieldKind::Binary => "yes / no".to_string(),
        FieldKind::Text => "text".to_string(),
    }
}

/// Build the table listing every requested field and its current value.
pub fn form_table(form: &FormView) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Parameter").fg(Color::White),
        Cell::new("Value").fg(Color::White),
        Cell::new("Accepts").fg(Color::White),
    ]);

    for field in &form.fields {
        let value_cell = match form.value_for(&field.name) {
            Some(value) => Cell::new(value).fg(Color::Green),
            None => Cell::new("missing").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&field.label).fg(Color::Cyan),
            value_cell,
            Cell::new(kind_hint(&field.kind)).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Print the form with a heading naming the intent.
pub fn print_form(form: &FormView) {
    let intent = form.intent.as_deref().unwrap_or("assessment");
    println!();
    println!(
        "  {} The agent needs more details for {}",
        style("?").yellow().bold(),
        style(intent).cyan()
    );
    println!();
    for line in form_table(form).to_string().lines() {
        println!("  {line}");
    }
    println!();
}
