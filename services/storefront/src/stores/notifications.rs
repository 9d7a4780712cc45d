//! services/storefront/src/stores/notifications.rs
//!
//! The notification channel: short-lived user-facing messages raised by the
//! stores. Entries expire after a fixed TTL; hosts either poll `active()` or
//! listen on the broadcast channel.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use storefront_core::domain::{Notice, NoticeVariant};
use storefront_core::ports::NotificationSink;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 32;

/// A notice stamped by the center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub variant: NoticeVariant,
    pub created_at: DateTime<Utc>,
}

struct Entry {
    notification: Notification,
    expires_at: Instant,
}

pub struct NotificationCenter {
    ttl: Duration,
    entries: Mutex<Vec<Entry>>,
    sender: broadcast::Sender<Notification>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
            sender,
        }
    }

    /// Stamps and records a notice, returning the stored notification.
    /// Expired entries are dropped here too, so hosts that only subscribe
    /// never accumulate them.
    pub fn push(&self, notice: Notice) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: notice.title,
            description: notice.description,
            variant: notice.variant,
            created_at: Utc::now(),
        };
        debug!("Notification '{}' ({})", notification.title, notification.id);

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|entry| entry.expires_at > now);
        entries.push(Entry {
            notification: notification.clone(),
            expires_at: now + self.ttl,
        });
        drop(entries);

        // No subscribers is fine; polling hosts still see it via `active()`.
        let _ = self.sender.send(notification.clone());
        notification
    }

    /// Notifications that have not expired or been dismissed, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|entry| entry.expires_at > now);
        entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|entry| entry.notification.id != id);
        entries.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, notice: Notice) {
        self.push(notice);
    }
}
