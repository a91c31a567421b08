//! Notification side channel shown to the user after each action.

use std::sync::{Arc, Mutex};

pub const FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationType {
    Default,
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Default => "default",
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationType,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationType, message: &str);
}

/// Sends `message`, or the generic fallback when it is blank.
pub fn send_notification(notifier: &dyn Notifier, kind: NotificationType, message: Option<&str>) {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => notifier.notify(kind, m),
        None => notifier.notify(kind, FALLBACK_MESSAGE),
    }
}

/// Prints notifications for the CLI and mirrors them as tracing events.
/// Errors and warnings always go to stderr; the rest go to stdout unless
/// built with `stderr_only`.
#[derive(Debug)]
pub struct TracingNotifier {
    stdout: bool,
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self { stdout: true }
    }
}

impl TracingNotifier {
    pub fn stderr_only() -> Self {
        Self { stdout: false }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationType, message: &str) {
        match kind {
            NotificationType::Error => tracing::warn!(kind = kind.as_str(), "{}", message),
            _ => tracing::info!(kind = kind.as_str(), "{}", message),
        }
        match kind {
            NotificationType::Error | NotificationType::Warning => {
                eprintln!("{}: {}", kind.as_str(), message)
            }
            _ if !self.stdout => eprintln!("{}", message),
            _ => println!("{}", message),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.seen.lock() {
            v.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationType, message: &str) {
        if let Ok(mut v) = self.seen.lock() {
            v.push(Notification {
                kind,
                message: message.to_string(),
            });
        }
    }
}
