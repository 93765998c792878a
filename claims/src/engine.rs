//! The claim lifecycle engine.
//!
//! Each public operation is one store transaction: load, validate against the
//! authorization matrix and the claim protocol, write. Notifications and the
//! match queue are only touched after the transaction has committed, so a
//! failed operation has no side effects at all.

use std::sync::Arc;

use tracing::info;

use reclaim_store::{ReadTxn, Store};
use reclaim_types::{Claim, ClaimFlow, ClaimId, Clock, Item, ItemId, ItemStatus, UserId};

use crate::matrix::{authorize, ActorRole, ClaimAction, Permission};
use crate::notification::{Notification, NotificationSink};
use crate::payload::{
    ClaimAnswers, ClaimSubmission, Decision, DecisionPayload, FoundItemReport, ItemPatch,
    LostItemReport,
};
use crate::protocol::protocol;
use crate::queue::MatchQueue;
use crate::ClaimError;

pub struct ClaimEngine<S> {
    pub(crate) store: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
    matching: Arc<dyn MatchQueue>,
    clock: Arc<dyn Clock>,
}

pub(crate) fn load_item<T: ReadTxn + ?Sized>(txn: &T, id: &ItemId) -> Result<Item, ClaimError> {
    txn.get_item(id)?.ok_or(ClaimError::ItemNotFound(*id))
}

pub(crate) fn load_claim<T: ReadTxn + ?Sized>(txn: &T, id: &ClaimId) -> Result<Claim, ClaimError> {
    txn.get_claim(id)?
        .ok_or_else(|| ClaimError::ClaimNotFound(format!("claim {id}")))
}

/// Turn a matrix verdict for `action` into the matching error.
fn permit(action: ClaimAction, permission: Permission) -> Result<(), ClaimError> {
    match (permission, action) {
        (Permission::Granted, _) => Ok(()),
        (Permission::NotApplicable, _) => Err(ClaimError::AnswerPhaseNotApplicable),
        (Permission::Forbidden, ClaimAction::Answer) => Err(ClaimError::NotItemOwner),
        (Permission::Forbidden, _) => Err(ClaimError::NotDecider),
        (Permission::NotReady, ClaimAction::Answer) => Err(ClaimError::ClaimNotPending),
        (Permission::NotReady, _) => Err(ClaimError::ClaimNotDecidable),
    }
}

impl<S: Store> ClaimEngine<S> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<dyn NotificationSink>,
        matching: Arc<dyn MatchQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            matching,
            clock,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) fn now(&self) -> reclaim_types::Timestamp {
        self.clock.now()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.deliver(notification);
    }

    // ── Reporting ───────────────────────────────────────────────────────

    /// Report a found item. The item is handed to the match queue once stored.
    pub fn report_found(&self, finder: &UserId, report: FoundItemReport) -> Result<Item, ClaimError> {
        let item = report.into_item(finder.clone(), self.now())?;
        self.store.write(|txn| -> Result<(), ClaimError> {
            txn.put_item(&item)?;
            Ok(())
        })?;
        info!(item = %item.id, finder = %finder, "found item reported");
        self.matching.enqueue(&item);
        Ok(item)
    }

    pub fn report_lost(&self, owner: &UserId, report: LostItemReport) -> Result<Item, ClaimError> {
        let item = report.into_item(owner.clone(), self.now())?;
        self.store.write(|txn| -> Result<(), ClaimError> {
            txn.put_item(&item)?;
            Ok(())
        })?;
        info!(item = %item.id, owner = %owner, "lost item reported");
        Ok(item)
    }

    // ── Maintenance ─────────────────────────────────────────────────────

    /// Patch an item's descriptive metadata. Reporter only.
    pub fn update_item(&self, item_id: &ItemId, actor: &UserId, patch: ItemPatch) -> Result<Item, ClaimError> {
        let patch = patch.validate()?;
        let item = self.store.write(|txn| -> Result<Item, ClaimError> {
            let mut item = load_item(&*txn, item_id)?;
            if !item.is_reporter(actor) {
                return Err(ClaimError::NotItemReporter);
            }
            patch.apply(&mut item.details);
            txn.put_item(&item)?;
            Ok(item)
        })?;
        info!(item = %item.id, "item updated");
        Ok(item)
    }

    /// Delete an item and every claim on it. Reporter only. Returns the number
    /// of claims removed.
    pub fn delete_item(&self, item_id: &ItemId, actor: &UserId) -> Result<usize, ClaimError> {
        let removed = self.store.write(|txn| -> Result<usize, ClaimError> {
            let item = load_item(&*txn, item_id)?;
            if !item.is_reporter(actor) {
                return Err(ClaimError::NotItemReporter);
            }
            let removed = txn.delete_claims_for_item(item_id)?;
            txn.delete_item(item_id)?;
            Ok(removed)
        })?;
        info!(item = %item_id, claims = removed, "item deleted");
        Ok(removed)
    }

    // ── Claims ──────────────────────────────────────────────────────────

    /// Submit a claim on an OPEN item.
    ///
    /// The protocol is chosen from the item type: a claim on a LOST item
    /// carries challenge questions for the owner, a claim on a FOUND item
    /// carries answers to the finder's verification prompts.
    pub fn submit_claim(
        &self,
        item_id: &ItemId,
        claimant: &UserId,
        submission: ClaimSubmission,
    ) -> Result<Claim, ClaimError> {
        submission.validate()?;
        let now = self.now();

        let (item, claim) = self.store.write(|txn| -> Result<(Item, Claim), ClaimError> {
            let item = load_item(&*txn, item_id)?;
            if !item.is_open() {
                return Err(ClaimError::ItemNotOpen);
            }
            if item.is_reporter(claimant) {
                return Err(ClaimError::OwnItem);
            }
            if txn.claim_by_claimant(item_id, claimant)?.is_some() {
                return Err(ClaimError::DuplicateClaim);
            }

            let flow = ClaimFlow::for_item(item.kind);
            let proto = protocol(flow);
            let claim = Claim {
                id: ClaimId::generate(),
                item_id: item.id,
                claimant_id: claimant.clone(),
                flow,
                status: proto.initial_status(),
                questions: proto.questions(&item, &submission)?,
                contacts: submission.contacts.clone(),
                note: submission.note.clone(),
                show_phone: submission.show_phone,
                created_at: now,
                decided_at: None,
            };
            // The index rejects a concurrent duplicate that slipped past the check.
            txn.insert_claim(&claim)?;
            Ok((item, claim))
        })?;

        info!(
            item = %item.id,
            claim = %claim.id,
            claimant = %claimant,
            flow = claim.flow.as_str(),
            "claim submitted"
        );
        if let Some(reporter) = item.reporter() {
            self.notify(Notification::claim_new(reporter.clone(), &item, &claim));
        }
        Ok(claim)
    }

    /// The owner of a LOST item answers the claimant's questions.
    pub fn answer_claim(
        &self,
        claim_id: &ClaimId,
        actor: &UserId,
        answers: ClaimAnswers,
    ) -> Result<Claim, ClaimError> {
        answers.validate()?;

        let (item, claim) = self.store.write(|txn| -> Result<(Item, Claim), ClaimError> {
            let mut claim = load_claim(&*txn, claim_id)?;
            let item = load_item(&*txn, &claim.item_id)?;
            let role = ActorRole::of(actor, &item, &claim);
            permit(
                ClaimAction::Answer,
                authorize(claim.flow, role, claim.status, ClaimAction::Answer),
            )?;
            protocol(claim.flow).record_answers(&mut claim, &answers.answers)?;
            txn.update_claim(&claim)?;
            Ok((item, claim))
        })?;

        info!(item = %item.id, claim = %claim.id, "claim answered");
        self.notify(Notification::claim_answered(&item, &claim));
        Ok(claim)
    }

    /// Approve or reject a claim.
    ///
    /// Approval moves the item to CLAIMED, binds the claimant to the role
    /// opposite the reporter and rejects every other undecided claim on the
    /// item. Rejection leaves the item OPEN.
    pub fn decide_claim(
        &self,
        claim_id: &ClaimId,
        decider: &UserId,
        payload: &DecisionPayload,
    ) -> Result<Claim, ClaimError> {
        let decision = payload.decision()?;
        let now = self.now();

        let (item, claim, displaced) = self.store.write(
            |txn| -> Result<(Item, Claim, Vec<Claim>), ClaimError> {
                let mut claim = load_claim(&*txn, claim_id)?;
                let mut item = load_item(&*txn, &claim.item_id)?;
                let role = ActorRole::of(decider, &item, &claim);
                permit(
                    ClaimAction::Decide,
                    authorize(claim.flow, role, claim.status, ClaimAction::Decide),
                )?;

                let mut displaced = Vec::new();
                if decision == Decision::Approved {
                    item.advance_status(ItemStatus::Claimed)
                        .map_err(|_| ClaimError::ItemNotOpen)?;
                    item.bind_counterparty(claim.claimant_id.clone());
                    txn.put_item(&item)?;

                    for mut other in txn.claims_for_item(&item.id)? {
                        if other.id == claim.id || other.is_terminal() {
                            continue;
                        }
                        protocol(other.flow).conclude(&mut other, Decision::Rejected, now);
                        txn.update_claim(&other)?;
                        displaced.push(other);
                    }
                }

                protocol(claim.flow).conclude(&mut claim, decision, now);
                txn.update_claim(&claim)?;
                Ok((item, claim, displaced))
            },
        )?;

        info!(
            item = %item.id,
            claim = %claim.id,
            status = claim.status.as_str(),
            auto_rejected = displaced.len(),
            "claim decided"
        );
        match decision {
            Decision::Approved => self.notify(Notification::claim_approved(&item, &claim)),
            Decision::Rejected => self.notify(Notification::claim_rejected(&item, &claim)),
        }
        for other in &displaced {
            self.notify(Notification::claim_rejected(&item, other));
        }
        Ok(claim)
    }
}
