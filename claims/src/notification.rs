//! Outbound notifications.
//!
//! The engine emits one [`Notification`] per state transition, after the
//! transaction has committed. Delivery is someone else's problem: a sink
//! accepts the event and never reports failure back.

use serde::Serialize;

use reclaim_types::{Claim, Item, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    ClaimNew,
    ClaimAnswered,
    ClaimApproved,
    ClaimRejected,
    QrVerified,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimNew => "CLAIM_NEW",
            Self::ClaimAnswered => "CLAIM_ANSWERED",
            Self::ClaimApproved => "CLAIM_APPROVED",
            Self::ClaimRejected => "CLAIM_REJECTED",
            Self::QrVerified => "QR_VERIFIED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient_id: UserId,
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    pub related_entity_id: String,
}

impl Notification {
    /// A LOST item's owner learns someone found it; a FOUND item's finder
    /// learns someone says it is theirs.
    pub fn claim_new(recipient: UserId, item: &Item, claim: &Claim) -> Self {
        let (title, body) = match claim.flow {
            reclaim_types::ClaimFlow::Lost => (
                "Someone found your item",
                format!(
                    "Someone reports finding \"{}\". Answer their questions to prove it is yours.",
                    item.details.title
                ),
            ),
            reclaim_types::ClaimFlow::Found => (
                "Someone claims an item you found",
                format!(
                    "Someone says \"{}\" is theirs. Review their answers.",
                    item.details.title
                ),
            ),
        };
        Self {
            recipient_id: recipient,
            title: title.to_string(),
            body,
            category: NotificationCategory::ClaimNew,
            related_entity_id: claim.id.to_string(),
        }
    }

    pub fn claim_answered(item: &Item, claim: &Claim) -> Self {
        Self {
            recipient_id: claim.claimant_id.clone(),
            title: "Your questions were answered".to_string(),
            body: format!(
                "The owner of \"{}\" answered your questions. Review them and decide.",
                item.details.title
            ),
            category: NotificationCategory::ClaimAnswered,
            related_entity_id: claim.id.to_string(),
        }
    }

    pub fn claim_approved(item: &Item, claim: &Claim) -> Self {
        Self {
            recipient_id: claim.claimant_id.clone(),
            title: "Claim approved".to_string(),
            body: format!(
                "Your claim on \"{}\" was approved. Get in touch to arrange the hand-over.",
                item.details.title
            ),
            category: NotificationCategory::ClaimApproved,
            related_entity_id: claim.id.to_string(),
        }
    }

    pub fn claim_rejected(item: &Item, claim: &Claim) -> Self {
        Self {
            recipient_id: claim.claimant_id.clone(),
            title: "Claim rejected".to_string(),
            body: format!("Your claim on \"{}\" was rejected.", item.details.title),
            category: NotificationCategory::ClaimRejected,
            related_entity_id: claim.id.to_string(),
        }
    }

    pub fn qr_verified(finder: UserId, item: &Item) -> Self {
        Self {
            recipient_id: finder,
            title: "Owner found via QR".to_string(),
            body: format!(
                "The owner of \"{}\" scanned its QR code and has been verified.",
                item.details.title
            ),
            category: NotificationCategory::QrVerified,
            related_entity_id: item.id.to_string(),
        }
    }
}

/// Fire-and-forget delivery of notifications.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: Notification);
}

/// Sink that only logs. Used when no delivery service is wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn deliver(&self, n: Notification) {
        tracing::info!(
            recipient = %n.recipient_id,
            category = n.category.as_str(),
            related = %n.related_entity_id,
            title = %n.title,
            "notification"
        );
    }
}
