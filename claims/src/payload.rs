//! Request payloads and their structural validation.
//!
//! Everything here is checked before the store is touched. Checks that depend
//! on the target item (questions vs. answers, known verification prompts) live
//! with the claim protocols.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reclaim_types::{
    ClaimStatus, Contact, Item, ItemDetails, ItemId, ItemStatus, ItemType, QuestionId,
    ReturnMethod, Timestamp, Urgency, UserId, Verification,
};

use crate::ClaimError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(raw: &str) -> Result<NaiveDate, ClaimError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ClaimError::InvalidDate(raw.to_string()))
}

fn require(value: &str, field: &'static str) -> Result<(), ClaimError> {
    if value.trim().is_empty() {
        return Err(ClaimError::BlankField(field));
    }
    Ok(())
}

fn validate_contacts(contacts: &[Contact]) -> Result<(), ClaimError> {
    contacts
        .iter()
        .try_for_each(|c| require(&c.value, "contact value"))
}

// ── Claims ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub question: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question: String,
    pub answer: String,
}

/// Body of a claim submission. Which of `questions` / `answers` is used
/// depends on the type of the target item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub show_phone: bool,
    #[serde(default)]
    pub note: String,
}

impl ClaimSubmission {
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.questions.is_empty() && self.answers.is_empty() {
            return Err(ClaimError::EmptySubmission);
        }
        for q in &self.questions {
            require(&q.question, "question")?;
        }
        for a in &self.answers {
            require(&a.question, "question")?;
            require(&a.answer, "answer")?;
        }
        validate_contacts(&self.contacts)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Body of the answer step on a LOST-flow claim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAnswers {
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}

impl ClaimAnswers {
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.answers.is_empty() {
            return Err(ClaimError::EmptyAnswerSet);
        }
        self.answers
            .iter()
            .try_for_each(|a| require(&a.answer, "answer"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(&self) -> ClaimStatus {
        match self {
            Self::Approved => ClaimStatus::Approved,
            Self::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Body of a decision. Kept as a raw string so that an unknown value is a
/// validation failure with its own reason rather than a parse error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub status: String,
}

impl DecisionPayload {
    pub fn decision(&self) -> Result<Decision, ClaimError> {
        match self.status.as_str() {
            "APPROVED" => Ok(Decision::Approved),
            "REJECTED" => Ok(Decision::Rejected),
            other => Err(ClaimError::InvalidDecision(other.to_string())),
        }
    }
}

// ── Items ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoundItemReport {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub verifications: Vec<Verification>,
    pub date_found: String,
    #[serde(default)]
    pub return_method: Option<ReturnMethod>,
    #[serde(default)]
    pub cod: bool,
    #[serde(default)]
    pub show_phone: bool,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub attached_qr: Option<String>,
}

impl FoundItemReport {
    /// Validate and build a fresh OPEN item reported by `finder`.
    pub fn into_item(self, finder: UserId, now: Timestamp) -> Result<Item, ClaimError> {
        require(&self.title, "title")?;
        if self.verifications.is_empty() {
            return Err(ClaimError::VerificationsRequired);
        }
        for v in &self.verifications {
            require(&v.question, "verification question")?;
            require(&v.answer, "verification answer")?;
        }
        validate_contacts(&self.contacts)?;
        let event_date = parse_date(&self.date_found)?;

        Ok(Item {
            id: ItemId::generate(),
            kind: ItemType::Found,
            status: ItemStatus::Open,
            finder_id: Some(finder),
            owner_id: None,
            verifications: self.verifications,
            attached_qr: self.attached_qr.filter(|qr| !qr.is_empty()),
            contacts: self.contacts,
            show_phone: self.show_phone,
            details: ItemDetails {
                title: self.title,
                description: self.description,
                category_id: self.category_id,
                location_id: self.location_id,
                location_description: String::new(),
                image_url: self.image_url,
                event_date,
                urgency: None,
                offer_reward: false,
                return_method: self.return_method,
                cod: self.cod,
            },
            created_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LostItemReport {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub location_last_seen: String,
    pub date_lost: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub offer_reward: bool,
    #[serde(default)]
    pub cod: bool,
    #[serde(default)]
    pub show_phone: bool,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl LostItemReport {
    /// Validate and build a fresh OPEN item reported by `owner`.
    pub fn into_item(self, owner: UserId, now: Timestamp) -> Result<Item, ClaimError> {
        require(&self.title, "title")?;
        validate_contacts(&self.contacts)?;
        let event_date = parse_date(&self.date_lost)?;

        Ok(Item {
            id: ItemId::generate(),
            kind: ItemType::Lost,
            status: ItemStatus::Open,
            finder_id: None,
            owner_id: Some(owner),
            verifications: Vec::new(),
            attached_qr: None,
            contacts: self.contacts,
            show_phone: self.show_phone,
            details: ItemDetails {
                title: self.title,
                description: self.description,
                category_id: self.category_id,
                location_id: None,
                location_description: self.location_last_seen,
                image_url: self.image_url,
                event_date,
                urgency: Some(self.urgency.unwrap_or(Urgency::Normal)),
                offer_reward: self.offer_reward,
                return_method: None,
                cod: self.cod,
            },
            created_at: now,
        })
    }
}

/// Partial update of an item's descriptive metadata. Absent fields are left
/// unchanged; status and role bindings cannot be patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub location_description: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub offer_reward: Option<bool>,
    #[serde(default)]
    pub cod: Option<bool>,
}

/// An [`ItemPatch`] that passed validation.
#[derive(Clone, Debug)]
pub struct ValidPatch {
    patch: ItemPatch,
    event_date: Option<NaiveDate>,
}

impl ItemPatch {
    pub fn validate(self) -> Result<ValidPatch, ClaimError> {
        if let Some(title) = &self.title {
            require(title, "title")?;
        }
        let event_date = self.event_date.as_deref().map(parse_date).transpose()?;
        Ok(ValidPatch {
            patch: self,
            event_date,
        })
    }
}

impl ValidPatch {
    pub fn apply(self, details: &mut ItemDetails) {
        let p = self.patch;
        if let Some(v) = p.title {
            details.title = v;
        }
        if let Some(v) = p.description {
            details.description = v;
        }
        if let Some(v) = p.image_url {
            details.image_url = v;
        }
        if let Some(v) = p.category_id {
            details.category_id = v;
        }
        if let Some(v) = p.location_id {
            details.location_id = Some(v);
        }
        if let Some(v) = p.location_description {
            details.location_description = v;
        }
        if let Some(v) = self.event_date {
            details.event_date = v;
        }
        if let Some(v) = p.urgency {
            details.urgency = Some(v);
        }
        if let Some(v) = p.offer_reward {
            details.offer_reward = v;
        }
        if let Some(v) = p.cod {
            details.cod = v;
        }
    }
}
