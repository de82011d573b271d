//! Bounded notification log.
//!
//! [`NotificationLog`] subscribes to the [`EventBus`](crate::bus::EventBus),
//! traces every notification at a level matching its severity, and keeps the
//! most recent ones for the notifications endpoint. It runs as a long-lived
//! background task and shuts down when the bus sender is dropped.

use std::collections::VecDeque;
use std::sync::RwLock;

use sketchform_core::notification::{Notification, Severity};
use tokio::sync::broadcast;

/// Default number of notifications retained.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

pub struct NotificationLog {
    capacity: usize,
    entries: RwLock<VecDeque<Notification>>,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Append a notification, evicting the oldest when full.
    pub fn record(&self, notification: Notification) {
        trace_notification(&notification);

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
    }

    /// Most recent notifications, newest first.
    pub fn recent(&self) -> Vec<Notification> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().cloned().collect()
    }

    /// Run the logging loop until the bus is closed.
    pub async fn run(&self, mut receiver: broadcast::Receiver<Notification>) {
        loop {
            match receiver.recv().await {
                Ok(notification) => self.record(notification),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification log lagged, some entries were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification log shutting down");
                    break;
                }
            }
        }
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

fn trace_notification(notification: &Notification) {
    let text = notification.message.as_str();
    match notification.severity {
        Severity::Info | Severity::Success => {
            tracing::info!(severity = notification.severity.as_str(), text, "Notification")
        }
        Severity::Warning => tracing::warn!(text, "Notification"),
        Severity::Error => tracing::error!(text, "Notification"),
    }
}
