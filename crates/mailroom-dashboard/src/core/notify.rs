//! Transient notifications raised by screen commands.
//!
//! # Design
//! - Notifications are plain data; surfaces decide how to render them.
//! - Expiry is driven by the caller's clock so tests stay deterministic.

use std::time::{Duration, Instant};

/// Notification severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Operation completed.
    Success,
    /// Neutral information.
    Info,
    /// Completed with caveats, or blocked locally.
    Warning,
    /// Operation failed.
    Error,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A dismissible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic identifier.
    pub id: u64,
    /// Severity classification.
    pub severity: Severity,
    /// Display message.
    pub message: String,
    /// When the notification was raised.
    pub raised_at: Instant,
}

/// Queue of live notifications.
#[derive(Clone, Debug)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
    lifetime: Duration,
}

impl Notifications {
    /// Empty queue whose entries expire after `lifetime`.
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
            lifetime,
        }
    }

    /// Raise a notification and return its id.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, severity = severity.as_str(), %message, "notification raised");
        self.items.push(Notification {
            id,
            severity,
            message,
            raised_at: Instant::now(),
        });
        id
    }

    /// Raise a success notification.
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(Severity::Success, message)
    }

    /// Raise a warning notification.
    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(Severity::Warning, message)
    }

    /// Raise an error notification.
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(Severity::Error, message)
    }

    /// Dismiss a notification by id; returns whether it was live.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drop notifications older than the lifetime at `now`; returns how many expired.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let lifetime = self.lifetime;
        self.items
            .retain(|item| now.saturating_duration_since(item.raised_at) < lifetime);
        before - self.items.len()
    }

    /// Live notifications, oldest first.
    #[must_use]
    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    /// Most recent live notification.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Remove and return every live notification.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_dismissible() {
        let mut queue = Notifications::new(Duration::from_secs(4));
        let first = queue.success("saved");
        let second = queue.error("failed");
        assert!(second > first);
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.latest().map(|n| n.severity), Some(Severity::Error));
    }

    #[test]
    fn expire_drops_old_entries() {
        let mut queue = Notifications::new(Duration::from_secs(4));
        queue.warning("heads up");
        let later = Instant::now() + Duration::from_secs(5);
        assert_eq!(queue.expire(later), 1);
        assert!(queue.active().is_empty());
    }

    #[test]
    fn drain_empties_queue() {
        let mut queue = Notifications::new(Duration::from_secs(4));
        queue.success("one");
        queue.success("two");
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.active().is_empty());
    }
}
