use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{ButtonColor, SoundButton};

/// Terminal color for a button tint.
pub(crate) fn tint(color: ButtonColor) -> Color {
    match color {
        ButtonColor::Red => Color::Red,
        ButtonColor::Orange => Color::Rgb(255, 140, 0),
        ButtonColor::Yellow => Color::Yellow,
        ButtonColor::Green => Color::Green,
        ButtonColor::Blue => Color::Blue,
        ButtonColor::Purple => Color::Magenta,
        ButtonColor::Gray => Color::Gray,
    }
}

/// Center `text` within `width` columns, truncating when it does not fit.
pub(crate) fn center_line(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut trimmed: String = text.trim().chars().take(width).collect();
    let len = trimmed.chars().count();
    let padding = width - len;
    let left = padding / 2;
    trimmed.insert_str(0, &" ".repeat(left));
    trimmed.push_str(&" ".repeat(padding - left));
    trimmed
}

/// Build the body of a button card: the title in the vertical middle and the
/// sound file name (or a hint that there is none) underneath.
pub(crate) fn build_button_card_lines(
    button: &SoundButton,
    inner_width: u16,
    inner_height: u16,
    selected: bool,
) -> Vec<Line<'static>> {
    let width = inner_width as usize;
    let height = inner_height as usize;
    if width == 0 || height == 0 {
        return vec![Line::from("")];
    }

    let title_style = if selected {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let (detail, detail_style) = match button.sound.locator() {
        Some(locator) => (locator.file_name(), Style::default().fg(Color::Gray)),
        None => (
            "no sound".to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let content_rows = if height >= 2 { 2 } else { 1 };
    let top = (height - content_rows) / 2;

    let mut lines = Vec::with_capacity(height);
    for _ in 0..top {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        center_line(&button.title, width),
        title_style,
    )));
    if content_rows == 2 {
        lines.push(Line::from(Span::styled(
            center_line(&detail, width),
            detail_style,
        )));
    }
    while lines.len() < height {
        lines.push(Line::from(""));
    }
    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SoundLocator, SoundSlot};

    #[test]
    fn center_line_pads_both_sides() {
        assert_eq!(center_line("ab", 6), "  ab  ");
        assert_eq!(center_line("abc", 6), " abc  ");
        assert_eq!(center_line("abcdefgh", 4), "abcd");
        assert_eq!(center_line("x", 0), "");
    }

    #[test]
    fn card_fills_requested_height() {
        let button = SoundButton::new(
            "Horn",
            SoundSlot::Set(SoundLocator::new("/s/horn.wav")),
            ButtonColor::Red,
        );
        let lines = build_button_card_lines(&button, 10, 5, false);
        assert_eq!(lines.len(), 5);

        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(text[1], "   Horn   ");
        assert_eq!(text[2], " horn.wav ");
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow::anyhow!("disk full").context("failed to save");
        assert_eq!(surface_error(&err), "disk full");
    }
}
