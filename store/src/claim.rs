//! Claim storage traits.

use crate::StoreError;
use reclaim_types::{Claim, ClaimId, ItemId, UserId};

/// Read access to claims.
pub trait ClaimReader {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError>;

    /// The claim `claimant` holds on `item`, if any.
    fn claim_by_claimant(
        &self,
        item: &ItemId,
        claimant: &UserId,
    ) -> Result<Option<Claim>, StoreError>;

    /// All claims on `item`, newest first.
    fn claims_for_item(&self, item: &ItemId) -> Result<Vec<Claim>, StoreError>;
}

/// Write access to claims.
pub trait ClaimWriter {
    /// Insert a new claim.
    ///
    /// Enforces the (item, claimant) uniqueness constraint: fails with
    /// [`StoreError::Duplicate`] when that pair already has a claim.
    fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError>;

    /// Replace an existing claim. Fails with [`StoreError::NotFound`] if the
    /// claim was never inserted. The (item, claimant) pair must not change.
    fn update_claim(&mut self, claim: &Claim) -> Result<(), StoreError>;

    /// Remove every claim on `item`. Returns how many were removed.
    fn delete_claims_for_item(&mut self, item: &ItemId) -> Result<usize, StoreError>;
}
