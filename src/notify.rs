//! Desktop notification seam
//!
//! The relay never talks to the OS; a host adapter implements [`Notifier`]
//! and forwards to whatever notification facility it has.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

/// Icon hint, serialized as the host's icon string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyIcon {
    Error,
    Done,
}

/// A desktop notification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: NotifyIcon,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, icon: NotifyIcon) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            icon,
        }
    }
}

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that logs instead of displaying (used by the replay CLI)
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            title = %notification.title,
            message = %notification.message,
            "notification"
        );
    }
}

/// Records notifications for assertions
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications sent so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Titles only, in order
    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}
