use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Localized;

/// A message from the school to one parent's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A short bilingual notice, either targeted at one parent or broadcast
/// to everyone (`parent_id` empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub title: Localized,
    pub body: Localized,
    pub created_at: DateTime<Utc>,
}
