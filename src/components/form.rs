//! Popup and field rendering shared by the input forms.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme;

const LABEL_WIDTH: usize = 7;

/// A rectangle of at most `max_w` x `max_h` centred in `area`.
pub fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.min(max_w);
    let h = area.height.min(max_h);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Clear a centred popup, draw its frame, and return the inner area.
pub fn popup(frame: &mut Frame, area: Rect, title: &str, accent: Color, size: (u16, u16)) -> Rect {
    let outer = centered(area, size.0, size.1);
    frame.render_widget(Clear, outer);

    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(outer);
    frame.render_widget(block, outer);
    inner
}

/// `key:Action` hints, keys in bold.
pub fn hints(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let spans = pairs.iter().flat_map(|(key, action)| {
        [
            Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(":{action} "), theme::DIM_STYLE),
        ]
    });
    Line::from(spans.collect::<Vec<_>>())
}

pub fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let mut spans = Vec::with_capacity(2);
    if !label.is_empty() {
        spans.push(Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH),
            theme::DIM_STYLE,
        ));
    }

    let (text, style) = if active {
        (format!("{value}_"), Style::default().fg(Color::Cyan))
    } else {
        (value.to_string(), Style::default())
    };
    spans.push(Span::styled(text, style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_popup_shrinks_to_fit() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(area, 50, 12), area);
        assert_eq!(centered(area, 20, 4), Rect::new(10, 3, 20, 4));
    }
}
