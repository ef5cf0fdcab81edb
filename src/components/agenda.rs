use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use reminders_tui::{CalendarEvent, Reminder};

use super::form::popup;
use super::reminder_list::truncate;
use crate::theme;

const DETAIL_SIZE: (u16, u16) = (60, 16);

/// Upcoming events grouped by day.
pub struct Agenda;

impl Agenda {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        events: &[CalendarEvent],
        days: u32,
        selected_index: usize,
        focused: bool,
    ) {
        let border_style = if focused {
            theme::FOCUSED_BORDER_STYLE
        } else {
            theme::BORDER_STYLE
        };

        let n = events.len();
        let count_str = format!(" {} event{} ", n, if n == 1 { "" } else { "s" });

        let block = Block::default()
            .title(format!(" Next {} days ", days))
            .title_style(theme::HEADER_STYLE)
            .title_bottom(Line::from(Span::styled(count_str, theme::DIM_STYLE)))
            .borders(Borders::ALL)
            .border_style(border_style);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No upcoming events").style(theme::DIM_STYLE);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let mut items: Vec<ListItem> = Vec::new();
        let mut current_day = None;

        for (i, ev) in events.iter().enumerate() {
            let day = ev.start_date.date_naive();
            if current_day != Some(day) {
                if current_day.is_some() {
                    items.push(ListItem::new(Line::from("")));
                }
                current_day = Some(day);
                items.push(ListItem::new(Line::from(Span::styled(
                    day.format("%A, %b %d").to_string(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ))));
            }
            items.push(format_event(ev, inner_w, i == selected_index && focused));
        }

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

fn format_event(ev: &CalendarEvent, max_width: usize, selected: bool) -> ListItem<'static> {
    let color = theme::event_color(ev.display_color.as_deref());
    let indicator = Span::styled("  ", Style::default().bg(color));

    let time_str = if ev.is_all_day {
        " all day ".to_string()
    } else {
        format!(" {} ", ev.duration_display())
    };
    let used = 2 + time_str.len();

    let title_style = if selected {
        theme::SELECTED_STYLE
    } else {
        Style::default()
    };
    let title = truncate(&ev.title, max_width.saturating_sub(used));

    let mut spans = vec![
        indicator,
        Span::styled(time_str, Style::default().add_modifier(Modifier::DIM)),
        Span::styled(title.clone(), title_style),
    ];

    if let Some(loc) = ev.location.as_deref().filter(|l| !l.is_empty()) {
        if used + title.chars().count() + 3 + loc.chars().count() <= max_width {
            spans.push(Span::styled(format!(" @ {}", loc), theme::DIM_STYLE));
        }
    }

    ListItem::new(Line::from(spans))
}

pub fn render_event_detail(frame: &mut Frame, area: Rect, ev: &CalendarEvent) {
    let inner = popup(frame, area, &ev.title, Color::Cyan, DETAIL_SIZE);

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled("Date: ", theme::DIM_STYLE),
        Span::raw(ev.start_date.format("%A, %B %d, %Y").to_string()),
    ])];

    if ev.is_all_day {
        lines.push(Line::from(Span::styled("All day", theme::DIM_STYLE)));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Time: ", theme::DIM_STYLE),
            Span::raw(ev.duration_display()),
        ]));
    }

    if let Some(loc) = ev.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("Location: ", theme::DIM_STYLE),
            Span::raw(loc.to_string()),
        ]));
    }

    push_notes(&mut lines, ev.notes.as_deref());
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

pub fn render_reminder_detail(frame: &mut Frame, area: Rect, rem: &Reminder) {
    let inner = popup(frame, area, &rem.title, Color::Yellow, DETAIL_SIZE);

    let status = if rem.is_completed { "Completed" } else { "Open" };
    let due = rem
        .due_date
        .map(|d| d.format("%A, %B %d, %Y %H:%M").to_string())
        .unwrap_or_else(|| "No date set".to_string());

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Status: ", theme::DIM_STYLE),
            Span::raw(status),
        ]),
        Line::from(vec![Span::styled("Due: ", theme::DIM_STYLE), Span::raw(due)]),
        Line::from(vec![
            Span::styled("Priority: ", theme::DIM_STYLE),
            Span::styled(
                rem.priority.label(),
                Style::default().fg(theme::priority_color(rem.priority)),
            ),
        ]),
    ];

    push_notes(&mut lines, rem.notes.as_deref());
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn push_notes(lines: &mut Vec<Line<'static>>, notes: Option<&str>) {
    if let Some(notes) = notes.filter(|n| !n.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes:", theme::DIM_STYLE)));
        for line in notes.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press Esc to close", theme::DIM_STYLE)));
}
