use ratatui::style::{Color, Modifier, Style};
use reminders_tui::Priority;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const FOCUSED_BORDER_STYLE: Style = Style::new().fg(Color::Cyan);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);
pub const OVERDUE_STYLE: Style = Style::new().fg(Color::Red);

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    }
}

/// Event colour from its stored `#rrggbb` attribute.
pub fn event_color(display_color: Option<&str>) -> Color {
    display_color.and_then(parse_hex).unwrap_or(Color::Green)
}

fn parse_hex(s: &str) -> Option<Color> {
    let s = s.trim();
    if !s.is_ascii() || !s.starts_with('#') || s.len() != 7 {
        return None;
    }
    let r = u8::from_str_radix(&s[1..3], 16).ok()?;
    let g = u8::from_str_radix(&s[3..5], 16).ok()?;
    let b = u8::from_str_radix(&s[5..7], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
