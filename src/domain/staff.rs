use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Localized;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    /// Job title, e.g. "Headteacher" / "Pennaeth".
    pub role: Localized,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    /// Display position on the staff page, lowest first.
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
