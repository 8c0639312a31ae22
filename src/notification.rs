use std::time::{Duration, Instant};

use crate::acquisition::AcquireError;
use crate::viewer::ViewerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A message shown at the bottom of the screen until it expires
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    default_duration: Duration,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_default_duration(Duration::from_secs(4))
    }

    pub fn with_default_duration(default_duration: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            default_duration,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        let notification = Notification::new(message, level, self.default_duration);
        self.notifications.insert(0, notification);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Info);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Error);
    }

    /// Report a file that could not be opened
    pub fn acquire_failed(&mut self, err: &AcquireError) {
        match err {
            AcquireError::InvalidFileType { .. } => self.warn(err.to_string()),
            AcquireError::Io { .. } => self.error(err.to_string()),
        }
    }

    pub fn viewer_event(&mut self, event: &ViewerEvent) {
        match event {
            ViewerEvent::Loaded { name, page_count } => {
                self.info(format!("Opened {name} ({page_count} pages)"));
            }
            ViewerEvent::LoadFailed { name, reason } => {
                self.error(format!("Could not open {name}: {reason}"));
            }
            ViewerEvent::RenderFailed { page, reason } => {
                self.error(format!("Could not render page {page}: {reason}"));
            }
        }
    }

    /// Remove expired notifications, returns true if any were removed
    pub fn update(&mut self) -> bool {
        let initial_len = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired());
        self.notifications.len() != initial_len
    }

    /// The most recent notification
    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    pub fn dismiss_current(&mut self) -> bool {
        if self.notifications.is_empty() {
            false
        } else {
            self.notifications.remove(0);
            true
        }
    }

    pub fn count(&self) -> usize {
        self.notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn notification_expiration() {
        let notification =
            Notification::new("test", NotificationLevel::Info, Duration::from_millis(50));
        assert!(!notification.is_expired());

        thread::sleep(Duration::from_millis(60));
        assert!(notification.is_expired());
    }

    #[test]
    fn newest_notification_is_current() {
        let mut manager = NotificationManager::new();

        manager.info("First");
        manager.warn("Second");
        manager.error("Third");

        assert_eq!(manager.count(), 3);

        let current = manager.current().unwrap();
        assert_eq!(current.message, "Third");
        assert_eq!(current.level, NotificationLevel::Error);
    }

    #[test]
    fn manager_removes_expired() {
        let mut manager = NotificationManager::with_default_duration(Duration::from_millis(50));

        manager.info("Short-lived");
        thread::sleep(Duration::from_millis(60));

        assert!(manager.update());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn invalid_file_type_is_a_warning() {
        let mut manager = NotificationManager::new();
        manager.acquire_failed(&AcquireError::InvalidFileType {
            name: "a.txt".to_string(),
            media_type: "text/plain".to_string(),
        });

        let current = manager.current().unwrap();
        assert_eq!(current.level, NotificationLevel::Warning);
        assert_eq!(current.message, "Please select a valid PDF file!");
    }

    #[test]
    fn load_failure_is_an_error() {
        let mut manager = NotificationManager::new();
        manager.viewer_event(&ViewerEvent::LoadFailed {
            name: "bad.pdf".to_string(),
            reason: "cannot parse document".to_string(),
        });

        let current = manager.current().unwrap();
        assert_eq!(current.level, NotificationLevel::Error);
        assert!(current.message.contains("bad.pdf"));
        assert!(manager.dismiss_current());
        assert!(manager.current().is_none());
    }
}
