//! Recording sinks for notifications and match-queue submissions.

use std::sync::{Mutex, PoisonError};

use reclaim_claims::{MatchQueue, Notification, NotificationCategory, NotificationSink};
use reclaim_types::{Item, ItemId, UserId};

/// Records every delivered notification.
#[derive(Default)]
pub struct NullNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    pub fn delivered(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn delivered_to(&self, recipient: &UserId) -> Vec<Notification> {
        self.delivered()
            .into_iter()
            .filter(|n| &n.recipient_id == recipient)
            .collect()
    }

    pub fn categories(&self) -> Vec<NotificationCategory> {
        self.delivered().iter().map(|n| n.category).collect()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl NotificationSink for NullNotifier {
    fn deliver(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Records the ids of items handed to the match queue.
#[derive(Default)]
pub struct NullMatchQueue {
    enqueued: Mutex<Vec<ItemId>>,
}

impl NullMatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> Vec<ItemId> {
        self.enqueued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MatchQueue for NullMatchQueue {
    fn enqueue(&self, item: &Item) {
        self.enqueued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.id);
    }
}
