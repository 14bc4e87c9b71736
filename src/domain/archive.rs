use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A news post or event moved out of its live collection.
///
/// `original_data` is a full JSON snapshot of the record at archival time;
/// it must always be sufficient to restore the item field-for-field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedItem {
    pub id: Uuid,
    pub title: String,
    pub item_type: ArchivedItemType,
    pub archived_at: DateTime<Utc>,
    pub reason: String,
    pub original_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchivedItemType {
    News,
    Event,
}
