use serde::Serialize;

use crate::domain::{CalendarEvent, NewsPost};

/// The ranked content block for the public homepage.
///
/// Derived fresh on every request from the live news and event collections;
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct HomepageContent {
    pub urgent_alert: Option<NewsPost>,
    pub items: Vec<HomepageItem>,
    pub stats: HomepageStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HomepageItem {
    News { priority: i32, post: NewsPost },
    Event { priority: i32, event: CalendarEvent },
}

impl HomepageItem {
    pub fn priority(&self) -> i32 {
        match self {
            HomepageItem::News { priority, .. } => *priority,
            HomepageItem::Event { priority, .. } => *priority,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomepageStats {
    pub total_news: usize,
    pub total_events: usize,
    pub urgent_alerts: usize,
}
