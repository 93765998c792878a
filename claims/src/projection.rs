//! Read-side projection with visibility redaction.
//!
//! Every read path (single item, listings, my-items, claim listings) goes
//! through these functions. Challenge answers, contact details and the raw QR
//! token are withheld here and nowhere else.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use reclaim_types::{
    Claim, ClaimFlow, ClaimId, ClaimStatus, Contact, Item, ItemId, ItemStatus, ItemType,
    PartyRole, QuestionId, ReturnMethod, Urgency, UserId,
};

use crate::matrix::{authorize, ActorRole, ClaimAction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question: String,
    /// `None` when unanswered or hidden from the viewer.
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimView {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub claimant_id: UserId,
    pub flow: ClaimFlow,
    /// FINDER for claims on LOST items, OWNER for claims on FOUND items.
    pub claimant_role: PartyRole,
    pub status: ClaimStatus,
    pub questions: Vec<QuestionView>,
    pub contacts: Vec<Contact>,
    pub note: String,
    pub show_phone: bool,
    pub created_at: String,
    pub decided_at: Option<String>,
}

/// A verification prompt. The secret answer is only filled in for the reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationPrompt {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub status: ItemStatus,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub location_description: String,
    pub image_url: String,
    pub event_date: NaiveDate,
    pub urgency: Option<Urgency>,
    pub offer_reward: bool,
    pub return_method: Option<ReturnMethod>,
    pub cod: bool,
    pub finder_id: Option<UserId>,
    pub owner_id: Option<UserId>,
    pub is_reporter: bool,
    pub verifications: Vec<VerificationPrompt>,
    pub has_qr: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_qr: Option<String>,
    pub show_phone: bool,
    pub contacts: Vec<Contact>,
    pub viewer_claim_status: Option<ClaimStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_claim: Option<ClaimView>,
    pub created_at: String,
}

/// Project `claim` for `viewer`.
pub fn project_claim(claim: &Claim, item: &Item, viewer: &UserId) -> ClaimView {
    let role = ActorRole::of(viewer, item, claim);
    let show_answers = authorize(claim.flow, role, claim.status, ClaimAction::ViewAnswers).is_granted();
    let show_contacts = claim.show_phone
        && authorize(claim.flow, role, claim.status, ClaimAction::ViewContacts).is_granted();

    ClaimView {
        id: claim.id,
        item_id: claim.item_id,
        claimant_id: claim.claimant_id.clone(),
        flow: claim.flow,
        claimant_role: claim.claimant_role(),
        status: claim.status,
        questions: claim
            .questions
            .iter()
            .map(|q| QuestionView {
                id: q.id,
                question: q.question.clone(),
                answer: if show_answers { q.answer.clone() } else { None },
            })
            .collect(),
        contacts: if show_contacts {
            claim.contacts.clone()
        } else {
            Vec::new()
        },
        note: claim.note.clone(),
        show_phone: claim.show_phone,
        created_at: claim.created_at.to_rfc3339(),
        decided_at: claim.decided_at.map(|t| t.to_rfc3339()),
    }
}

/// Project `item` for `viewer`.
///
/// `viewer_claim` is the viewer's own claim on the item, `approved` the
/// item's approved claim; either may be absent.
pub fn project_item(
    item: &Item,
    viewer: &UserId,
    viewer_claim: Option<&Claim>,
    approved: Option<&Claim>,
) -> ItemView {
    let is_reporter = item.is_reporter(viewer);
    let d = &item.details;

    let approved_claim = approved
        .filter(|c| is_reporter || &c.claimant_id == viewer)
        .map(|c| project_claim(c, item, viewer));

    ItemView {
        id: item.id,
        kind: item.kind,
        status: item.status,
        title: d.title.clone(),
        description: d.description.clone(),
        category_id: d.category_id,
        location_id: d.location_id,
        location_description: d.location_description.clone(),
        image_url: d.image_url.clone(),
        event_date: d.event_date,
        urgency: d.urgency,
        offer_reward: d.offer_reward,
        return_method: d.return_method,
        cod: d.cod,
        finder_id: item.finder_id.clone(),
        owner_id: item.owner_id.clone(),
        is_reporter,
        verifications: item
            .verifications
            .iter()
            .map(|v| VerificationPrompt {
                question: v.question.clone(),
                answer: is_reporter.then(|| v.answer.clone()),
            })
            .collect(),
        has_qr: item.qr_token().is_some(),
        attached_qr: if is_reporter {
            item.qr_token().map(str::to_string)
        } else {
            None
        },
        show_phone: item.show_phone,
        contacts: if item.show_phone || is_reporter {
            item.contacts.clone()
        } else {
            Vec::new()
        },
        viewer_claim_status: viewer_claim.map(|c| c.status),
        approved_claim,
        created_at: item.created_at.to_rfc3339(),
    }
}
