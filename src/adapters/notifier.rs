use crate::domain::model::{Notification, NotificationLevel};
use crate::domain::ports::NotificationSink;
use std::sync::{Arc, Mutex};

/// 終端機版的 toast：輸出到 stdout 並寫入日誌
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let icon = match notification.level {
            NotificationLevel::Success => "✅",
            NotificationLevel::Error => "❌",
            NotificationLevel::Info => "ℹ️",
        };

        match notification.level {
            NotificationLevel::Error => tracing::error!(
                "{} {}: {}",
                icon,
                notification.title,
                notification.message
            ),
            _ => tracing::info!("{} {}: {}", icon, notification.title, notification.message),
        }

        println!("{} {}: {}", icon, notification.title, notification.message);
    }
}

/// 保留所有通知，方便檢查或於結束時彙整
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut list) = self.notifications.lock() {
            list.push(notification);
        }
    }
}
