//! The claim aggregate: one actor's attempt to resolve an item's ownership.

use serde::{Deserialize, Serialize};

use crate::{
    ClaimId, ClaimStatus, Contact, ItemId, ItemType, PartyRole, QuestionId, Timestamp, UserId,
};

/// Which of the two claim protocols a claim follows. Fixed at construction
/// from the item type and never changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimFlow {
    /// Against a LOST item: the claimant found it and challenges the owner.
    Lost,
    /// Against a FOUND item: the claimant says it is theirs and answers the
    /// finder's prompts up front.
    Found,
}

impl ClaimFlow {
    pub fn for_item(kind: ItemType) -> Self {
        match kind {
            ItemType::Lost => Self::Lost,
            ItemType::Found => Self::Found,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Lost => ItemType::Lost,
            Self::Found => ItemType::Found,
        }
    }

    /// The role the claimant plays in this flow.
    pub fn claimant_role(&self) -> PartyRole {
        self.item_type().reporter_role().opposite()
    }

    pub fn as_str(&self) -> &'static str {
        self.item_type().as_str()
    }
}

/// A challenge question, answered now (FOUND flow) or later (LOST flow).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimQuestion {
    pub id: QuestionId,
    pub question: String,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub claimant_id: UserId,
    pub flow: ClaimFlow,
    pub status: ClaimStatus,
    pub questions: Vec<ClaimQuestion>,
    pub contacts: Vec<Contact>,
    pub note: String,
    /// The claimant agreed to reveal contact details once approved.
    pub show_phone: bool,
    pub created_at: Timestamp,
    pub decided_at: Option<Timestamp>,
}

impl Claim {
    pub fn claimant_role(&self) -> PartyRole {
        self.flow.claimant_role()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Copy each answer onto the question with the matching id. Answers for
    /// unknown question ids are ignored. Returns how many were applied.
    pub fn merge_answers<'a, I>(&mut self, answers: I) -> usize
    where
        I: IntoIterator<Item = (&'a QuestionId, &'a str)>,
    {
        let mut applied = 0;
        for (id, answer) in answers {
            if let Some(q) = self.questions.iter_mut().find(|q| &q.id == id) {
                q.answer = Some(answer.to_string());
                applied += 1;
            }
        }
        applied
    }
}
