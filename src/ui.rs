use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::model::{Direction, ExpectedMove};

/// Width of the probability meter bars, in characters.
pub const METER_WIDTH: usize = 12;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Cell for a rate movement direction, with arrow and color.
pub fn direction_cell(direction: Direction) -> Cell {
    match direction {
        Direction::Up => Cell::new("▲ up").fg(Color::Green),
        Direction::Down => Cell::new("▼ down").fg(Color::Red),
        Direction::Neutral => Cell::new("– neutral").fg(Color::DarkGrey),
    }
}

/// Cell for the next expected policy move. Cuts render red, hikes green.
pub fn move_cell(next_move: ExpectedMove) -> Cell {
    match next_move {
        ExpectedMove::Cut => Cell::new(next_move.to_string()).fg(Color::Red),
        ExpectedMove::Hike => Cell::new(next_move.to_string()).fg(Color::Green),
        ExpectedMove::NoChange => Cell::new(next_move.to_string()),
    }
}

/// Renders a textual probability meter, e.g. `████████░░░░ 70%`. The fill
/// width saturates at the bar width; the label shows the raw value.
pub fn meter(percentage: &str, width: usize) -> String {
    let pct = percentage
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .unwrap_or(0.0);
    let ratio = (pct / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "{}{} {percentage}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

pub fn meter_cell(percentage: &str, color: Color) -> Cell {
    Cell::new(meter(percentage, METER_WIDTH)).fg(color)
}

/// Creates a styled spinner for in-flight fetches.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_fill_widths() {
        assert_eq!(meter("0", 10), "░░░░░░░░░░ 0%");
        assert_eq!(meter("50", 10), "█████░░░░░ 50%");
        assert_eq!(meter("100", 10), "██████████ 100%");
    }

    #[test]
    fn test_meter_saturates_out_of_range_values() {
        // Values outside [0, 100] are trusted in the label but the bar
        // stays within its width.
        assert_eq!(meter("150", 10), "██████████ 150%");
        assert_eq!(meter("-10", 10), "░░░░░░░░░░ -10%");
    }

    #[test]
    fn test_meter_unparsable_value_renders_empty_bar() {
        assert_eq!(meter("N/A", 4), "░░░░ N/A%");
    }
}
