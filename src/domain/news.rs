use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Localized;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: Uuid,
    pub slug: String,
    pub title: Localized,
    pub body: Localized,
    /// Publish date. Lifecycle windows and recency scoring count from here,
    /// not from `created_at`.
    pub date: DateTime<Utc>,
    pub is_urgent: bool,
    pub published: bool,
    pub linked_event_id: Option<Uuid>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
