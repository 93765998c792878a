//! The authorization matrix.
//!
//! A pure function of (claim flow, actor role, claim status, action). Every
//! combination is spelled out so adding a flow, role, status or action is a
//! compile error until the table covers it.

use reclaim_types::{Claim, ClaimFlow, ClaimStatus, Item, UserId};

/// How an actor relates to a particular claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorRole {
    /// Reported the item: owner of a LOST item, finder of a FOUND item.
    Reporter,
    /// Submitted the claim.
    Claimant,
    /// Anyone else.
    Stranger,
}

impl ActorRole {
    pub fn of(actor: &UserId, item: &Item, claim: &Claim) -> Self {
        if &claim.claimant_id == actor {
            Self::Claimant
        } else if item.is_reporter(actor) {
            Self::Reporter
        } else {
            Self::Stranger
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClaimAction {
    /// Supply answers to the claimant's challenge questions.
    Answer,
    /// Approve or reject.
    Decide,
    /// See the answers attached to the claim's questions.
    ViewAnswers,
    /// See the claimant's contact details.
    ViewContacts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    /// The role may never perform the action on this flow.
    Forbidden,
    /// The role may perform the action, but not in the claim's current status.
    NotReady,
    /// The action does not exist in this flow.
    NotApplicable,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

pub fn authorize(
    flow: ClaimFlow,
    role: ActorRole,
    status: ClaimStatus,
    action: ClaimAction,
) -> Permission {
    use ActorRole::*;
    use ClaimAction::*;
    use ClaimStatus::*;
    use Permission::*;

    match (action, flow, role) {
        // FOUND-flow answers arrive with the submission.
        (Answer, ClaimFlow::Found, _) => NotApplicable,
        // The owner answers the finder's questions, once.
        (Answer, ClaimFlow::Lost, Reporter) => when(status == Pending),
        (Answer, ClaimFlow::Lost, Claimant | Stranger) => Forbidden,

        // The finder judges the owner's answers after they arrive.
        (Decide, ClaimFlow::Lost, Claimant) => when(status == PendingApproval),
        (Decide, ClaimFlow::Lost, Reporter | Stranger) => Forbidden,
        // The finder judges the claimant's up-front answers.
        (Decide, ClaimFlow::Found, Reporter) => when(matches!(status, Pending | PendingApproval)),
        (Decide, ClaimFlow::Found, Claimant | Stranger) => Forbidden,

        (ViewAnswers, _, Reporter) => Granted,
        (ViewAnswers, _, Claimant) => when(matches!(status, PendingApproval | Approved)),
        (ViewAnswers, _, Stranger) => Forbidden,

        (ViewContacts, _, Reporter | Claimant) => when(status == Approved),
        (ViewContacts, _, Stranger) => Forbidden,
    }
}

fn when(ready: bool) -> Permission {
    if ready {
        Permission::Granted
    } else {
        Permission::NotReady
    }
}
