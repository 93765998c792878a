//! Composite key encoding.
//!
//! Identifiers are stored as their 16 raw UUID bytes. User identities have
//! variable length, so wherever one leads a composite key it is prefixed
//! with its length (u16 big-endian); otherwise `"ab"` would be a prefix of
//! `"abc"` and a range scan would leak across users.

use reclaim_types::{ItemId, UserId};

/// `item_id ++ claimant`: one entry per (item, claimant) pair. Scanning the
/// 16-byte item prefix lists every claim on the item.
pub(crate) fn claim_index_key(item: &ItemId, claimant: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + claimant.as_bytes().len());
    key.extend_from_slice(item.as_bytes());
    key.extend_from_slice(claimant.as_bytes());
    key
}

/// `len(user) ++ user`: prefix of every binding key for `user`.
pub(crate) fn binding_prefix(user: &UserId) -> Vec<u8> {
    let bytes = user.as_bytes();
    // UserId caps its length well below u16::MAX.
    let len = bytes.len() as u16;
    let mut key = Vec::with_capacity(2 + bytes.len() + 16);
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(bytes);
    key
}

/// `len(user) ++ user ++ item_id`: records that `user` is bound to `item`.
pub(crate) fn binding_key(user: &UserId, item: &ItemId) -> Vec<u8> {
    let mut key = binding_prefix(user);
    key.extend_from_slice(item.as_bytes());
    key
}

/// Recover the item id from the tail of a binding key.
pub(crate) fn item_from_binding_key(key: &[u8]) -> Option<ItemId> {
    let tail = key.len().checked_sub(16).map(|start| &key[start..])?;
    let bytes: [u8; 16] = tail.try_into().ok()?;
    Some(ItemId::from_bytes(bytes))
}
