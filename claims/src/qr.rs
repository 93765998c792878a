//! QR fast-path: a found item's attached token, compared byte-for-byte
//! against the requester's identity, settles ownership without a claim.

use tracing::{debug, info};

use reclaim_store::Store;
use reclaim_types::{ItemId, ItemStatus, ItemType, UserId};

use crate::engine::{load_item, ClaimEngine};
use crate::notification::Notification;
use crate::ClaimError;

impl<S: Store> ClaimEngine<S> {
    /// Returns `true` and claims the item for `requester` when the token
    /// matches exactly; returns `false` and changes nothing otherwise.
    pub fn verify_qr(&self, item_id: &ItemId, requester: &UserId) -> Result<bool, ClaimError> {
        let claimed = self.store.write(|txn| -> Result<Option<_>, ClaimError> {
            let mut item = load_item(&*txn, item_id)?;
            if item.kind != ItemType::Found {
                return Err(ClaimError::QrNotSupported);
            }
            if item.qr_token().is_none() {
                return Err(ClaimError::QrNotAttached);
            }
            if !item.is_open() {
                return Err(ClaimError::ItemNotOpen);
            }
            if item.qr_token() != Some(requester.as_str()) {
                return Ok(None);
            }

            item.bind_counterparty(requester.clone());
            item.advance_status(ItemStatus::Claimed)
                .map_err(|_| ClaimError::ItemNotOpen)?;
            txn.put_item(&item)?;
            Ok(Some(item))
        })?;

        let Some(item) = claimed else {
            debug!(item = %item_id, "QR token mismatch");
            return Ok(false);
        };
        info!(item = %item.id, owner = %requester, "item claimed via QR");
        if let Some(finder) = item.finder_id.clone() {
            self.notify(Notification::qr_verified(finder, &item));
        }
        Ok(true)
    }
}
