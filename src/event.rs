use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// The next key press, if one arrives within `timeout`.
///
/// Release and repeat events are skipped, as are mouse and resize events.
pub fn next_key_press(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    while event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}
