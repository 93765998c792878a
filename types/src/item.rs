//! The item aggregate: a reported lost or found object and its role bindings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ItemId, ItemStatus, ItemType, PartyRole, Timestamp, TypesError, UserId};

/// A reported item.
///
/// `finder_id` is bound at report time for FOUND items, `owner_id` for LOST
/// items. The opposing binding is filled in once ownership is resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemType,
    pub status: ItemStatus,
    pub finder_id: Option<UserId>,
    pub owner_id: Option<UserId>,
    /// Challenge prompts (with secret answers) set by the finder of a FOUND item.
    pub verifications: Vec<Verification>,
    /// Pre-shared token compared byte-for-byte against a requester's identity.
    pub attached_qr: Option<String>,
    pub contacts: Vec<Contact>,
    pub show_phone: bool,
    pub details: ItemDetails,
    pub created_at: Timestamp,
}

impl Item {
    /// The user who reported this item: the owner of a LOST item, the finder
    /// of a FOUND item.
    pub fn reporter(&self) -> Option<&UserId> {
        self.bound(self.kind.reporter_role())
    }

    pub fn is_reporter(&self, user: &UserId) -> bool {
        self.reporter() == Some(user)
    }

    /// The user bound to `role`, if any.
    pub fn bound(&self, role: PartyRole) -> Option<&UserId> {
        match role {
            PartyRole::Finder => self.finder_id.as_ref(),
            PartyRole::Owner => self.owner_id.as_ref(),
        }
    }

    /// Bind `user` to the role opposite the reporter's (the owner of a FOUND
    /// item, the finder of a LOST item).
    pub fn bind_counterparty(&mut self, user: UserId) {
        match self.kind.reporter_role().opposite() {
            PartyRole::Finder => self.finder_id = Some(user),
            PartyRole::Owner => self.owner_id = Some(user),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Move the item forward in its lifecycle. Regressions (and no-op
    /// transitions) are refused.
    pub fn advance_status(&mut self, next: ItemStatus) -> Result<(), TypesError> {
        if !self.status.can_advance_to(next) {
            return Err(TypesError::StatusRegression {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Whether `question` is one of this item's verification prompts (exact text).
    pub fn has_verification_question(&self, question: &str) -> bool {
        self.verifications.iter().any(|v| v.question == question)
    }

    /// The attached QR token, treating an empty string as absent.
    pub fn qr_token(&self) -> Option<&str> {
        self.attached_qr.as_deref().filter(|t| !t.is_empty())
    }
}

/// A challenge prompt and its secret answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub question: String,
    pub answer: String,
}

/// A contact handle on some messaging platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub platform: Platform,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Whatsapp,
    Instagram,
    Telegram,
    Line,
    Twitter,
    Email,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Normal,
    High,
    Critical,
}

/// How a finder intends to hand a found item back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnMethod {
    BringByFinder,
    HandedToSecurity,
}

/// Descriptive metadata. Not part of the state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub title: String,
    pub description: String,
    /// Reference into the external category catalog.
    pub category_id: Uuid,
    /// Reference into the external location catalog.
    pub location_id: Option<Uuid>,
    /// Free-text location ("last seen near the canteen").
    pub location_description: String,
    pub image_url: String,
    /// The day the item was found or lost.
    pub event_date: NaiveDate,
    pub urgency: Option<Urgency>,
    pub offer_reward: bool,
    pub return_method: Option<ReturnMethod>,
    /// Cash on delivery for the hand-over.
    pub cod: bool,
}
