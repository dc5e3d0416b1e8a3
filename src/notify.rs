//! User-visible success/failure notifications ("toasts").

use std::sync::Mutex;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A single emitted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Sink for notifications raised by the session store.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Emits notifications as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => tracing::info!(notification = message, "Notification"),
            Level::Error => tracing::warn!(notification = message, "Notification"),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                level,
                message: message.to_string(),
            });
    }
}
