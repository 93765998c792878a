//! Nullable store — thread-safe in-memory storage for testing.
//!
//! Write transactions run against a copy of the tables that replaces the
//! original only when the closure succeeds, so rollback behaves like the real
//! backend. The single mutex serializes writers the same way LMDB does.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use reclaim_store::{
    ClaimReader, ClaimWriter, ItemFilter, ItemReader, ItemWriter, ReadTxn, Store, StoreError,
    WriteTxn,
};
use reclaim_types::{Claim, ClaimId, Item, ItemId, UserId};

#[derive(Clone, Default)]
struct Tables {
    items: BTreeMap<ItemId, Item>,
    claims: BTreeMap<ClaimId, Claim>,
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl ItemReader for Tables {
    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get(id).cloned())
    }

    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = self
            .items
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        newest_first(&mut items, |i| (i.created_at, std::cmp::Reverse(i.id)));
        Ok(items)
    }

    fn items_bound_to(&self, user: &UserId) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = self
            .items
            .values()
            .filter(|i| i.finder_id.as_ref() == Some(user) || i.owner_id.as_ref() == Some(user))
            .cloned()
            .collect();
        newest_first(&mut items, |i| (i.created_at, std::cmp::Reverse(i.id)));
        Ok(items)
    }
}

impl ItemWriter for Tables {
    fn put_item(&mut self, item: &Item) -> Result<(), StoreError> {
        self.items.insert(item.id, item.clone());
        Ok(())
    }

    fn delete_item(&mut self, id: &ItemId) -> Result<bool, StoreError> {
        Ok(self.items.remove(id).is_some())
    }
}

impl ClaimReader for Tables {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError> {
        Ok(self.claims.get(id).cloned())
    }

    fn claim_by_claimant(
        &self,
        item: &ItemId,
        claimant: &UserId,
    ) -> Result<Option<Claim>, StoreError> {
        Ok(self
            .claims
            .values()
            .find(|c| &c.item_id == item && &c.claimant_id == claimant)
            .cloned())
    }

    fn claims_for_item(&self, item: &ItemId) -> Result<Vec<Claim>, StoreError> {
        let mut claims: Vec<Claim> = self
            .claims
            .values()
            .filter(|c| &c.item_id == item)
            .cloned()
            .collect();
        newest_first(&mut claims, |c| (c.created_at, std::cmp::Reverse(c.id)));
        Ok(claims)
    }
}

impl ClaimWriter for Tables {
    fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        if self.claim_by_claimant(&claim.item_id, &claim.claimant_id)?.is_some()
            || self.claims.contains_key(&claim.id)
        {
            return Err(StoreError::Duplicate(format!(
                "claim by {} on item {}",
                claim.claimant_id, claim.item_id
            )));
        }
        self.claims.insert(claim.id, claim.clone());
        Ok(())
    }

    fn update_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        match self.claims.get_mut(&claim.id) {
            Some(slot) => {
                *slot = claim.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("claim {}", claim.id))),
        }
    }

    fn delete_claims_for_item(&mut self, item: &ItemId) -> Result<usize, StoreError> {
        let before = self.claims.len();
        self.claims.retain(|_, c| &c.item_id != item);
        Ok(before - self.claims.len())
    }
}

/// An in-memory item + claim store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent transaction fail as if the backend were down.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    /// Seed an item directly, bypassing the engine.
    pub fn insert_item(&self, item: Item) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.items.insert(item.id, item);
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<Item> {
        self.tables.lock().ok()?.items.get(id).cloned()
    }

    pub fn claim(&self, id: &ClaimId) -> Option<Claim> {
        self.tables.lock().ok()?.claims.get(id).cloned()
    }

    pub fn claim_count(&self) -> usize {
        self.tables.lock().map(|t| t.claims.len()).unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(())
    }
}

impl Store for NullStore {
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.check_available()?;
        let tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        f(&*tables)
    }

    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.check_available()?;
        let mut tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let mut draft = tables.clone();
        let out = f(&mut draft)?;
        *tables = draft;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_store_fails_every_transaction() {
        let store = NullStore::new();
        store.set_unavailable(true);
        let read: Result<Option<Item>, StoreError> =
            store.read(|txn| txn.get_item(&ItemId::generate()));
        assert!(matches!(read, Err(StoreError::Backend(_))));
    }

    #[test]
    fn failed_write_leaves_tables_untouched() {
        let store = NullStore::new();
        let result: Result<usize, StoreError> = store.write(|txn| {
            txn.delete_claims_for_item(&ItemId::generate())?;
            Err(StoreError::Backend("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.claim_count(), 0);
    }
}
