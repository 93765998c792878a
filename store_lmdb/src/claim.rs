//! Claim reads and writes, plus the (item, claimant) uniqueness index.

use heed::RwTxn;

use reclaim_store::{ClaimReader, ClaimWriter, StoreError};
use reclaim_types::{Claim, ClaimId, ItemId, UserId};

use crate::keys::claim_index_key;
use crate::txn::{decode, id_bytes, AsRoTxn, Databases, LmdbTxn};
use crate::LmdbError;

fn read_claim(dbs: &Databases, txn: &heed::RoTxn<'_>, id: &ClaimId) -> Result<Option<Claim>, LmdbError> {
    match dbs.claims.get(txn, &id.as_bytes()[..])? {
        Some(bytes) => Ok(Some(decode(bytes)?)),
        None => Ok(None),
    }
}

/// (index key, claim id) for every claim on `item`.
fn index_entries(
    dbs: &Databases,
    txn: &heed::RoTxn<'_>,
    item: &ItemId,
) -> Result<Vec<(Vec<u8>, ClaimId)>, LmdbError> {
    let mut entries = Vec::new();
    for entry in dbs.claim_index.prefix_iter(txn, &item.as_bytes()[..])? {
        let (key, value) = entry?;
        let id = ClaimId::from_bytes(id_bytes(value, "claim index value")?);
        entries.push((key.to_vec(), id));
    }
    Ok(entries)
}

impl<'e, T: AsRoTxn<'e>> ClaimReader for LmdbTxn<'e, T> {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError> {
        Ok(read_claim(self.dbs, self.txn.ro(), id)?)
    }

    fn claim_by_claimant(
        &self,
        item: &ItemId,
        claimant: &UserId,
    ) -> Result<Option<Claim>, StoreError> {
        let txn = self.txn.ro();
        let key = claim_index_key(item, claimant);
        let Some(raw) = self.dbs.claim_index.get(txn, &key).map_err(LmdbError::from)? else {
            return Ok(None);
        };
        let id = ClaimId::from_bytes(id_bytes(raw, "claim index value")?);
        Ok(read_claim(self.dbs, txn, &id)?)
    }

    fn claims_for_item(&self, item: &ItemId) -> Result<Vec<Claim>, StoreError> {
        let txn = self.txn.ro();
        let mut claims = Vec::new();
        for (_, id) in index_entries(self.dbs, txn, item)? {
            if let Some(claim) = read_claim(self.dbs, txn, &id)? {
                claims.push(claim);
            }
        }
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(claims)
    }
}

impl<'e> ClaimWriter for LmdbTxn<'e, RwTxn<'e>> {
    fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        let key = claim_index_key(&claim.item_id, &claim.claimant_id);
        if self.dbs.claim_index.get(&self.txn, &key).map_err(LmdbError::from)?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "claim by {} on item {}",
                claim.claimant_id, claim.item_id
            )));
        }
        if read_claim(self.dbs, &self.txn, &claim.id)?.is_some() {
            return Err(StoreError::Duplicate(format!("claim {}", claim.id)));
        }

        let bytes = bincode::serialize(claim).map_err(LmdbError::from)?;
        self.dbs
            .claims
            .put(&mut self.txn, &claim.id.as_bytes()[..], &bytes)
            .map_err(LmdbError::from)?;
        self.dbs
            .claim_index
            .put(&mut self.txn, &key, &claim.id.as_bytes()[..])
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn update_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        if read_claim(self.dbs, &self.txn, &claim.id)?.is_none() {
            return Err(StoreError::NotFound(format!("claim {}", claim.id)));
        }
        let bytes = bincode::serialize(claim).map_err(LmdbError::from)?;
        self.dbs
            .claims
            .put(&mut self.txn, &claim.id.as_bytes()[..], &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_claims_for_item(&mut self, item: &ItemId) -> Result<usize, StoreError> {
        let entries = index_entries(self.dbs, &self.txn, item)?;
        for (key, id) in &entries {
            self.dbs
                .claim_index
                .delete(&mut self.txn, key)
                .map_err(LmdbError::from)?;
            self.dbs
                .claims
                .delete(&mut self.txn, &id.as_bytes()[..])
                .map_err(LmdbError::from)?;
        }
        Ok(entries.len())
    }
}
