//! Item reads and writes.

use heed::RwTxn;

use reclaim_store::{ItemFilter, ItemReader, ItemWriter, StoreError};
use reclaim_types::{Item, ItemId, UserId};

use crate::keys::{binding_key, binding_prefix, item_from_binding_key};
use crate::txn::{decode, AsRoTxn, Databases, LmdbTxn};
use crate::LmdbError;

fn read_item(dbs: &Databases, txn: &heed::RoTxn<'_>, id: &ItemId) -> Result<Option<Item>, LmdbError> {
    match dbs.items.get(txn, &id.as_bytes()[..])? {
        Some(bytes) => Ok(Some(decode(bytes)?)),
        None => Ok(None),
    }
}

fn bound_users(item: &Item) -> impl Iterator<Item = &UserId> {
    item.finder_id.iter().chain(item.owner_id.iter())
}

/// Newest first; ties broken by id so listings are stable.
pub(crate) fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

impl<'e, T: AsRoTxn<'e>> ItemReader for LmdbTxn<'e, T> {
    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(read_item(self.dbs, self.txn.ro(), id)?)
    }

    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        for entry in self.dbs.items.iter(self.txn.ro()).map_err(LmdbError::from)? {
            let (_key, bytes) = entry.map_err(LmdbError::from)?;
            let item: Item = decode(bytes)?;
            if filter.matches(&item) {
                items.push(item);
            }
        }
        sort_newest_first(&mut items);
        Ok(items)
    }

    fn items_bound_to(&self, user: &UserId) -> Result<Vec<Item>, StoreError> {
        let txn = self.txn.ro();
        let prefix = binding_prefix(user);
        let mut ids = Vec::new();
        for entry in self.dbs.bindings.prefix_iter(txn, &prefix).map_err(LmdbError::from)? {
            let (key, _) = entry.map_err(LmdbError::from)?;
            let id = item_from_binding_key(key)
                .filter(|_| key.len() == prefix.len() + 16)
                .ok_or_else(|| LmdbError::Corrupt(format!("binding key for {user}")))?;
            ids.push(id);
        }

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(item) = read_item(self.dbs, txn, &id)? {
                items.push(item);
            }
        }
        sort_newest_first(&mut items);
        Ok(items)
    }
}

impl<'e> ItemWriter for LmdbTxn<'e, RwTxn<'e>> {
    fn put_item(&mut self, item: &Item) -> Result<(), StoreError> {
        if let Some(previous) = read_item(self.dbs, &self.txn, &item.id)? {
            for user in bound_users(&previous) {
                self.dbs
                    .bindings
                    .delete(&mut self.txn, &binding_key(user, &item.id))
                    .map_err(LmdbError::from)?;
            }
        }
        for user in bound_users(item) {
            self.dbs
                .bindings
                .put(&mut self.txn, &binding_key(user, &item.id), &[])
                .map_err(LmdbError::from)?;
        }

        let bytes = bincode::serialize(item).map_err(LmdbError::from)?;
        self.dbs
            .items
            .put(&mut self.txn, &item.id.as_bytes()[..], &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_item(&mut self, id: &ItemId) -> Result<bool, StoreError> {
        let Some(item) = read_item(self.dbs, &self.txn, id)? else {
            return Ok(false);
        };
        for user in bound_users(&item) {
            self.dbs
                .bindings
                .delete(&mut self.txn, &binding_key(user, id))
                .map_err(LmdbError::from)?;
        }
        let existed = self
            .dbs
            .items
            .delete(&mut self.txn, &id.as_bytes()[..])
            .map_err(LmdbError::from)?;
        Ok(existed)
    }
}
