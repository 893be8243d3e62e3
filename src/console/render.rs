//! Pure formatting helpers behind the [`Presenter`](super::Presenter)
//! defaults. No I/O here, so everything is testable with plain strings.

use std::time::Duration;

use crossterm::style::Color;
use unicode_width::UnicodeWidthStr;

use crate::core::command::Command;
use crate::core::result::CommandStatus;

/// Extra columns between the longest command name and the descriptions.
pub const COMMAND_COLUMN_PADDING: usize = 4;

/// Mirrors a title decoration so it closes the title: `"-==< "` becomes
/// `" >==-"`.
pub fn reversed(decoration: &str) -> String {
    decoration
        .chars()
        .rev()
        .map(|c| match c {
            '<' => '>',
            '>' => '<',
            '(' => ')',
            ')' => '(',
            '[' => ']',
            ']' => '[',
            '{' => '}',
            '}' => '{',
            other => other,
        })
        .collect()
}

/// One line per command: the name padded to the longest name plus
/// [`COMMAND_COLUMN_PADDING`], then the description.
pub fn command_rows(commands: &[Command]) -> Vec<String> {
    let column = commands
        .iter()
        .map(|c| c.name().width())
        .max()
        .unwrap_or(0)
        + COMMAND_COLUMN_PADDING;

    commands
        .iter()
        .map(|c| {
            let pad = column.saturating_sub(c.name().width());
            format!("{}{} {}", c.name(), " ".repeat(pad), c.description())
        })
        .collect()
}

/// Seconds with two decimals under a minute, minutes with two decimals
/// otherwise.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.2}m", secs / 60.0)
    }
}

pub fn status_label(status: CommandStatus) -> &'static str {
    match status {
        CommandStatus::Success => "Success",
        CommandStatus::Failure => "Failed",
        CommandStatus::Cancelled => "Cancelled",
    }
}

pub fn status_colour(status: CommandStatus) -> Color {
    match status {
        CommandStatus::Success => Color::Green,
        CommandStatus::Failure => Color::Red,
        CommandStatus::Cancelled => Color::Yellow,
    }
}
