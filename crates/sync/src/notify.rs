//! Non-blocking user notifications (toasts) raised by the stores.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for notifications. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(title = %notification.title, "{}", notification.message)
            }
            NotificationLevel::Error => {
                tracing::warn!(title = %notification.title, "{}", notification.message)
            }
        }
    }
}

/// Keeps every notification in memory, for assertions and UI bridges that
/// poll.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Drain recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }

    pub fn errors(&self) -> usize {
        self.all()
            .iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order_and_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::error("Error", "first"));
        notifier.notify(Notification::success("Saved", "second"));

        assert_eq!(notifier.errors(), 1);
        let taken = notifier.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].message, "first");
        assert!(notifier.all().is_empty());
    }
}
