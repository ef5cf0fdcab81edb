mod app;
mod components;
mod event;
mod logging;
mod theme;
mod tui;

use std::sync::Arc;
use std::time::Duration;

use app::{App, Focus, InputMode};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use reminders_tui::config::APP_NAME;
use reminders_tui::{Config, DesktopNotificationCenter, Planner, Scheduler, Store};

const IDLE_SLEEP: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    let _log_guard = logging::init(&config.log_dir)?;
    tracing::info!(database = %config.database.display(), "starting");

    eprintln!("Opening {}...", config.database.display());
    let store = Store::open(&config.database)?;
    let center = Arc::new(DesktopNotificationCenter::new(APP_NAME, config.notifications));
    let scheduler = Scheduler::new(center);
    let planner = Planner::new(store, scheduler).with_lead_minutes(config.event_lead_minutes);

    let mut app = App::new(planner, config.upcoming_days);
    app.start().await;

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| render(frame, app))?;

        // Poll without blocking so notification timers keep running.
        let Some(key) = event::next_key_press(Duration::ZERO)? else {
            app.tick();
            tokio::time::sleep(IDLE_SLEEP).await;
            continue;
        };

        app.status_message = None;

        if app.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                app.show_help = false;
            }
            continue;
        }

        if app.show_detail {
            if key.code == KeyCode::Esc || key.code == KeyCode::Enter {
                app.show_detail = false;
            }
            continue;
        }

        match app.input_mode {
            InputMode::Normal => handle_normal_input(app, key.code, key.modifiers).await,
            InputMode::ReminderForm => handle_reminder_form_input(app, key.code).await,
            InputMode::EventForm => handle_event_form_input(app, key.code).await,
        }
    }

    Ok(())
}

async fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Tab, _) => app.toggle_focus(),
        (KeyCode::Char('v'), _) => app.cycle_reminder_view(),
        (KeyCode::Char('r'), _) => {
            app.refresh();
            app.status_message = Some("Refreshed".to_string());
        }
        (KeyCode::Char('n'), _) => app.open_new_form(),
        (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.delete_selected().await,
        (KeyCode::Char(' '), _) => {
            if app.focus == Focus::Reminders {
                app.toggle_selected_reminder().await;
            }
        }
        (KeyCode::Enter, _) => {
            app.show_detail = match app.focus {
                Focus::Reminders => app.selected_reminder().is_some(),
                Focus::Events => app.selected_event().is_some(),
            };
        }
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

async fn handle_reminder_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_reminder_form().await,
        _ => {
            let Some(form) = app.reminder_form.as_mut() else {
                return;
            };
            match code {
                KeyCode::Tab => form.active_field = form.active_field.next(),
                KeyCode::BackTab => form.active_field = form.active_field.prev(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(' ')
                    if form.active_field
                        == components::reminder_form::ReminderField::Priority =>
                {
                    form.cycle_priority()
                }
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            }
        }
    }
}

async fn handle_event_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_event_form().await,
        _ => {
            let Some(form) = app.event_form.as_mut() else {
                return;
            };
            match code {
                KeyCode::Tab => form.active_field = form.active_field.next(),
                KeyCode::BackTab => form.active_field = form.active_field.prev(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(' ')
                    if form.active_field == components::event_form::EventField::AllDay =>
                {
                    form.toggle_all_day()
                }
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            }
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content_area = layout[0];
    let now = app.now();

    let columns = if area.width >= 80 {
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(content_area)
    } else {
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(content_area)
    };

    components::ReminderList::render(
        frame,
        columns[0],
        &app.reminders,
        app.reminder_view,
        app.selected_reminder,
        app.focus == Focus::Reminders,
        now,
    );
    components::Agenda::render(
        frame,
        columns[1],
        &app.events,
        app.upcoming_days,
        app.selected_event,
        app.focus == Focus::Events,
    );

    if let Some(ref form) = app.reminder_form {
        components::ReminderForm::render(frame, area, form);
    }
    if let Some(ref form) = app.event_form {
        components::EventForm::render(frame, area, form);
    }

    if app.show_detail {
        match app.focus {
            Focus::Reminders => {
                if let Some(rem) = app.selected_reminder() {
                    components::agenda::render_reminder_detail(frame, area, rem);
                }
            }
            Focus::Events => {
                if let Some(ev) = app.selected_event() {
                    components::agenda::render_event_detail(frame, area, ev);
                }
            }
        }
    }

    if app.show_help {
        render_help(frame, area);
    }

    render_status_bar(frame, layout[1], app);
}

fn render_status_bar(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let w = area.width as usize;

    let mut left = format!(" {} ", app.reminder_view.label());
    if app.overdue_count > 0 {
        left.push_str(&format!("| {} overdue ", app.overdue_count));
    }
    if !app.notifications_granted {
        left.push_str("| notifications off ");
    }

    let right_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if w >= 80 {
        " Tab:Focus v:View n:New e:Edit Sp:Done d:Del Enter:Detail ?:Help q:Quit ".to_string()
    } else if w >= 50 {
        " Tab:Focus n:New Sp:Done q:Quit ".to_string()
    } else {
        " ?:Help q:Quit ".to_string()
    };

    let padding = " ".repeat(w.saturating_sub(left.len() + right_text.len()));
    let left_style = if app.overdue_count > 0 {
        theme::STATUS_STYLE.fg(ratatui::style::Color::LightRed)
    } else {
        theme::STATUS_STYLE
    };

    let line = Line::from(vec![
        Span::styled(left, left_style),
        Span::styled(padding, theme::STATUS_STYLE),
        Span::styled(right_text, theme::STATUS_STYLE),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Paragraph, Wrap};

    let inner = components::form::popup(frame, area, "Keybindings", Color::Green, (52, 18));

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("j/k", "Move selection"),
        entry("Tab", "Switch reminders / events"),
        entry("v", "Today / Overdue / Open / All"),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        entry("n", "New reminder or event"),
        entry("e", "Edit selected reminder"),
        entry("Space", "Toggle reminder completion"),
        entry("d", "Delete selected item"),
        entry("Enter", "Show details"),
        entry("r", "Refresh"),
        Line::from(""),
        entry("Esc", "Close popup or form"),
        entry("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
