//! Read paths. Every result passes through [`crate::projection`].

use tracing::debug;

use reclaim_store::{ItemFilter, ReadTxn, Store};
use reclaim_types::{ClaimId, ClaimStatus, Item, ItemId, UserId};

use crate::engine::{load_claim, load_item, ClaimEngine};
use crate::projection::{project_claim, project_item, ClaimView, ItemView};
use crate::ClaimError;

fn view_of<T: ReadTxn + ?Sized>(txn: &T, item: &Item, viewer: &UserId) -> Result<ItemView, ClaimError> {
    let own = txn.claim_by_claimant(&item.id, viewer)?;
    // Only a taken item can have an approved claim.
    let approved = if item.is_open() {
        None
    } else {
        txn.claims_for_item(&item.id)?
            .into_iter()
            .find(|c| c.status == ClaimStatus::Approved)
    };
    Ok(project_item(item, viewer, own.as_ref(), approved.as_ref()))
}

impl<S: Store> ClaimEngine<S> {
    pub fn item(&self, item_id: &ItemId, viewer: &UserId) -> Result<ItemView, ClaimError> {
        self.store.read(|txn| -> Result<ItemView, ClaimError> {
            let item = load_item(txn, item_id)?;
            view_of(txn, &item, viewer)
        })
    }

    /// One page of items matching `filter`, newest first.
    pub fn list_items(
        &self,
        filter: &ItemFilter,
        viewer: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ItemView>, ClaimError> {
        debug!(?filter, offset, limit, "listing items");
        self.store.read(|txn| -> Result<Vec<ItemView>, ClaimError> {
            txn.list_items(filter)?
                .iter()
                .skip(offset)
                .take(limit)
                .map(|item| view_of(txn, item, viewer))
                .collect()
        })
    }

    /// Items the viewer reported or was bound to on resolution.
    pub fn my_items(&self, viewer: &UserId) -> Result<Vec<ItemView>, ClaimError> {
        self.store.read(|txn| -> Result<Vec<ItemView>, ClaimError> {
            txn.items_bound_to(viewer)?
                .iter()
                .map(|item| view_of(txn, item, viewer))
                .collect()
        })
    }

    /// Every claim on an item. Reporter only.
    pub fn claims_for_item(&self, item_id: &ItemId, viewer: &UserId) -> Result<Vec<ClaimView>, ClaimError> {
        self.store.read(|txn| -> Result<Vec<ClaimView>, ClaimError> {
            let item = load_item(txn, item_id)?;
            if !item.is_reporter(viewer) {
                return Err(ClaimError::NotItemReporter);
            }
            Ok(txn
                .claims_for_item(item_id)?
                .iter()
                .map(|c| project_claim(c, &item, viewer))
                .collect())
        })
    }

    /// A single claim, visible only to its claimant and the item's reporter.
    /// Anyone else is told it does not exist.
    pub fn claim(&self, claim_id: &ClaimId, viewer: &UserId) -> Result<ClaimView, ClaimError> {
        self.store.read(|txn| -> Result<ClaimView, ClaimError> {
            let claim = load_claim(txn, claim_id)?;
            let item = load_item(txn, &claim.item_id)?;
            if &claim.claimant_id != viewer && !item.is_reporter(viewer) {
                return Err(ClaimError::ClaimNotFound(format!("claim {claim_id}")));
            }
            Ok(project_claim(&claim, &item, viewer))
        })
    }

    /// The viewer's own claim on an item.
    pub fn my_claim(&self, item_id: &ItemId, viewer: &UserId) -> Result<ClaimView, ClaimError> {
        self.store.read(|txn| -> Result<ClaimView, ClaimError> {
            let item = load_item(txn, item_id)?;
            let claim = txn
                .claim_by_claimant(item_id, viewer)?
                .ok_or_else(|| ClaimError::ClaimNotFound(format!("claim by {viewer} on item {item_id}")))?;
            Ok(project_claim(&claim, &item, viewer))
        })
    }
}
