use crate::domain::model::{ActivityEntry, ActivityKind};
use crate::utils::format::time_ago;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

/// 最近活動紀錄，新的在前；超過容量時淘汰最舊的一筆
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, kind: ActivityKind, title: impl Into<String>, description: impl Into<String>) {
        self.push_entry(ActivityEntry {
            kind,
            title: title.into(),
            description: description.into(),
            timestamp: Utc::now(),
        });
    }

    /// 回傳被淘汰的項目（若有）
    pub fn push_entry(&mut self, entry: ActivityEntry) -> Option<ActivityEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            return self.entries.pop_back();
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn render(&self, now: DateTime<Utc>) -> Vec<String> {
        if self.entries.is_empty() {
            return vec!["No hay actividad reciente".to_string()];
        }

        self.entries
            .iter()
            .map(|entry| {
                let icon = match entry.kind {
                    ActivityKind::Success => "✅",
                    ActivityKind::Error => "❌",
                    ActivityKind::Info => "ℹ️",
                };
                format!(
                    "{} {} - {} ({})",
                    icon,
                    entry.title,
                    entry.description,
                    time_ago(entry.timestamp, now)
                )
            })
            .collect()
    }
}
