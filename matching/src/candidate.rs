use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reclaim_types::{Item, ItemId, ItemType};

/// What the matching service is told about a freshly reported item. Secrets
/// (verification answers, the QR token, contacts) are never included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub event_date: NaiveDate,
    pub reported_at: String,
}

impl From<&Item> for MatchCandidate {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id,
            kind: item.kind,
            title: item.details.title.clone(),
            description: item.details.description.clone(),
            category_id: item.details.category_id,
            location_id: item.details.location_id,
            event_date: item.details.event_date,
            reported_at: item.created_at.to_rfc3339(),
        }
    }
}
