//! Item storage traits.

use crate::StoreError;
use reclaim_types::{Item, ItemId, ItemStatus, ItemType, UserId};

/// Optional filters for listing items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub kind: Option<ItemType>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        self.status.map_or(true, |s| item.status == s) && self.kind.map_or(true, |k| item.kind == k)
    }
}

/// Read access to items.
pub trait ItemReader {
    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Items matching `filter`, newest first.
    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError>;

    /// Items where `user` is bound as finder or owner, newest first.
    fn items_bound_to(&self, user: &UserId) -> Result<Vec<Item>, StoreError>;
}

/// Write access to items.
pub trait ItemWriter {
    /// Insert or replace an item, keeping the finder/owner index in sync.
    fn put_item(&mut self, item: &Item) -> Result<(), StoreError>;

    /// Remove an item. Returns whether it existed.
    fn delete_item(&mut self, id: &ItemId) -> Result<bool, StoreError>;
}
