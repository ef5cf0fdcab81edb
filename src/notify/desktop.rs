use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{NotificationAction, NotificationCategory, NotificationCenter, NotificationRequest};
use crate::clock::{Clock, SystemClock};
use crate::error::NotificationError;

struct Pending {
    request: NotificationRequest,
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    authorized: bool,
    generation: u64,
    categories: HashMap<String, Vec<NotificationAction>>,
    pending: HashMap<String, Pending>,
}

/// Desktop notifications shown through notify-rust when a tokio timer expires.
///
/// Must be used from within a tokio runtime.
pub struct DesktopNotificationCenter {
    app_name: String,
    enabled: bool,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<State>>,
}

impl DesktopNotificationCenter {
    pub fn new(app_name: impl Into<String>, enabled: bool) -> Self {
        Self {
            app_name: app_name.into(),
            enabled,
            clock: Arc::new(SystemClock),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Drop for DesktopNotificationCenter {
    fn drop(&mut self) {
        for (_, pending) in lock(&self.state).pending.drain() {
            pending.task.abort();
        }
    }
}

#[async_trait]
impl NotificationCenter for DesktopNotificationCenter {
    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        lock(&self.state).authorized = self.enabled;
        Ok(self.enabled)
    }

    async fn set_categories(&self, categories: Vec<NotificationCategory>) {
        let mut state = lock(&self.state);
        state.categories = categories.into_iter().map(|c| (c.id, c.actions)).collect();
    }

    async fn request(&self, mut request: NotificationRequest) -> Result<(), NotificationError> {
        let mut state = lock(&self.state);
        if !state.authorized {
            debug!(id = %request.id, "notifications not authorized, dropping request");
            return Ok(());
        }

        if let Some(actions) = state.categories.get(&request.category) {
            request.actions = actions.clone();
        }

        state.generation += 1;
        let generation = state.generation;
        let delay = (request.fire_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        // The lock is held until the entry is inserted, so the timer can
        // never observe the map without it.
        let task = tokio::spawn(fire_after(
            delay,
            request.id.clone(),
            generation,
            self.app_name.clone(),
            Arc::clone(&self.state),
        ));

        let id = request.id.clone();
        let replaced = state.pending.insert(
            id,
            Pending {
                request,
                generation,
                task,
            },
        );
        if let Some(old) = replaced {
            old.task.abort();
        }
        Ok(())
    }

    async fn cancel(&self, id: &str) {
        if let Some(pending) = lock(&self.state).pending.remove(id) {
            pending.task.abort();
            debug!(id, "cancelled notification");
        }
    }

    async fn pending(&self) -> Vec<NotificationRequest> {
        let state = lock(&self.state);
        let mut requests: Vec<NotificationRequest> =
            state.pending.values().map(|p| p.request.clone()).collect();
        requests.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.id.cmp(&b.id)));
        requests
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn fire_after(
    delay: Duration,
    id: String,
    generation: u64,
    app_name: String,
    state: Arc<Mutex<State>>,
) {
    tokio::time::sleep(delay).await;

    let request = {
        let mut state = lock(&state);
        match state.pending.get(&id) {
            Some(p) if p.generation == generation => state.pending.remove(&id).map(|p| p.request),
            _ => None,
        }
    };
    let Some(request) = request else {
        return;
    };

    match tokio::task::spawn_blocking(move || show(&app_name, &request)).await {
        Ok(Ok(())) => debug!(%id, "delivered notification"),
        Ok(Err(err)) => warn!(%id, error = %err, "failed to deliver notification"),
        Err(err) => warn!(%id, error = %err, "notification delivery task failed"),
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
const NOTIFICATION_SOUND: &str = "message-new-instant";
#[cfg(not(all(unix, not(target_os = "macos"))))]
const NOTIFICATION_SOUND: &str = "Default";

fn notification(app_name: &str, request: &NotificationRequest) -> notify_rust::Notification {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname(app_name)
        .summary(&request.title)
        .body(&request.body)
        .sound_name(NOTIFICATION_SOUND);
    for action in &request.actions {
        notification.action(&action.id, &action.title);
    }
    notification
}

fn show(app_name: &str, request: &NotificationRequest) -> Result<(), NotificationError> {
    notification(app_name, request)
        .show()
        .map(|_| ())
        .map_err(|err| NotificationError::Platform(err.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::notify::{COMPLETE_ACTION, HIGH_PRIORITY_REMINDER};

    fn request() -> NotificationRequest {
        NotificationRequest {
            id: "r1".to_string(),
            fire_at: Local.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap(),
            title: "Reminder".to_string(),
            body: "Pay rent".to_string(),
            category: HIGH_PRIORITY_REMINDER.to_string(),
            actions: vec![NotificationAction::new(COMPLETE_ACTION, "Mark Complete")],
        }
    }

    #[test]
    fn notification_carries_request_text() {
        let n = notification("reminders", &request());
        assert_eq!(n.summary, "Reminder");
        assert_eq!(n.body, "Pay rent");
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn notification_plays_the_message_sound() {
        let n = notification("reminders", &request());
        assert!(n
            .hints
            .contains(&notify_rust::Hint::SoundName("message-new-instant".to_string())));
        assert_eq!(n.actions, vec![COMPLETE_ACTION.to_string(), "Mark Complete".to_string()]);
    }
}
