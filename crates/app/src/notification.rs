//! Transient user notifications ("toasts").

use chrono::{DateTime, Duration, Utc};

/// How long a notification stays visible, in seconds.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

fn ttl() -> Duration {
    Duration::seconds(NOTIFICATION_TTL_SECS)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub posted_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.posted_at + ttl()
    }
}

/// Holds at most one notification; posting replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    current: Option<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.post(message.into(), NotificationLevel::Success, Utc::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.post(message.into(), NotificationLevel::Error, Utc::now());
    }

    pub fn post(&mut self, message: String, level: NotificationLevel, posted_at: DateTime<Utc>) {
        self.current = Some(Notification {
            message,
            level,
            posted_at,
        });
    }

    /// The notification still visible at `now`, if any.
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.is_visible_at(now))
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current_at(Utc::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let mut notifications = Notifications::new();
        let t0 = Utc::now();
        notifications.post("saved".to_string(), NotificationLevel::Success, t0);

        assert!(notifications.current_at(t0 + Duration::seconds(2)).is_some());
        assert!(notifications.current_at(t0 + ttl()).is_none());
    }

    #[test]
    fn newer_notification_replaces_older() {
        let mut notifications = Notifications::new();
        notifications.success("first");
        notifications.error("second");

        let current = notifications.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, NotificationLevel::Error);

        notifications.dismiss();
        assert!(notifications.current().is_none());
    }
}
