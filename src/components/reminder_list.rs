use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use reminders_tui::Reminder;

use crate::app::ReminderView;
use crate::theme;

pub struct ReminderList;

impl ReminderList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        reminders: &[Reminder],
        view: ReminderView,
        selected_index: usize,
        focused: bool,
        now: DateTime<Local>,
    ) {
        let w = area.width as usize;

        let title = if w >= 25 {
            format!(" Reminders: {} ({}) ", view.label(), reminders.len())
        } else {
            format!(" {} ", view.label())
        };

        let border_style = if focused {
            theme::FOCUSED_BORDER_STYLE
        } else {
            theme::BORDER_STYLE
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(border_style);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders").style(theme::DIM_STYLE);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                format_reminder(reminder, inner_w, i == selected_index && focused, now)
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

fn format_reminder(
    reminder: &Reminder,
    max_width: usize,
    selected: bool,
    now: DateTime<Local>,
) -> ListItem<'static> {
    let marker = Span::styled(
        "\u{258c}",
        Style::default().fg(theme::priority_color(reminder.priority)),
    );

    let checkbox = if reminder.is_completed { "[x] " } else { "[ ] " };
    let title_style = if selected {
        theme::SELECTED_STYLE
    } else if reminder.is_completed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![
        marker,
        Span::raw(checkbox),
        Span::styled(
            truncate(&reminder.title, max_width.saturating_sub(18)),
            title_style,
        ),
    ];

    if let Some(due) = reminder.due_date {
        let due_str = if due.date_naive() == now.date_naive() {
            format!(" {}", due.format("%H:%M"))
        } else {
            format!(" {}", due.format("%m/%d %H:%M"))
        };
        let style = if reminder.is_overdue(now) {
            theme::OVERDUE_STYLE
        } else {
            theme::DIM_STYLE
        };
        if spans.iter().map(|s| s.width()).sum::<usize>() + due_str.len() <= max_width {
            spans.push(Span::styled(due_str, style));
        }
    }

    ListItem::new(Line::from(spans))
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
