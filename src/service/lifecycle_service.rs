use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::ContentConfig,
    domain::{ArchivedItem, ArchivedItemType, CalendarEvent, NewsPost},
    error::Result,
    repository::{ArchiveRepository, EventRepository, NewsRepository},
};

/// True once an urgent post's display window has lapsed. Used both by the
/// cleanup batch and by the homepage prioritizer, so stale urgent banners
/// disappear even before an archival run executes.
pub fn should_archive_urgent_alert(
    post: &NewsPost,
    config: &ContentConfig,
    now: DateTime<Utc>,
) -> bool {
    post.is_urgent && (now - post.date).num_days() > config.urgent_alert_duration_days
}

pub fn is_news_active(post: &NewsPost, config: &ContentConfig, now: DateTime<Utc>) -> bool {
    if post.is_urgent {
        !should_archive_urgent_alert(post, config, now)
    } else {
        (now - post.date).num_days() <= config.news_retention_days
    }
}

pub fn is_event_active(event: &CalendarEvent, config: &ContentConfig, now: DateTime<Utc>) -> bool {
    (now - event.effective_end()).num_days() <= config.event_retention_days
}

/// Outcome of one archival batch. Per-item failures are collected here
/// rather than aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub news_archived: usize,
    pub events_archived: usize,
    pub errors: Vec<CleanupError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupError {
    pub id: Uuid,
    pub message: String,
}

pub struct LifecycleService {
    news_repo: Arc<dyn NewsRepository>,
    event_repo: Arc<dyn EventRepository>,
    archive_repo: Arc<dyn ArchiveRepository>,
    config: ContentConfig,
}

impl LifecycleService {
    pub fn new(
        news_repo: Arc<dyn NewsRepository>,
        event_repo: Arc<dyn EventRepository>,
        archive_repo: Arc<dyn ArchiveRepository>,
        config: ContentConfig,
    ) -> Self {
        Self {
            news_repo,
            event_repo,
            archive_repo,
            config,
        }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Sweep the live collections and archive everything past its window.
    ///
    /// Idempotent: archived items leave the live tables, so re-running
    /// against an already-clean store archives nothing. There is no
    /// transaction across items; a failure part-way leaves earlier
    /// archivals in place and is reported in the error list.
    pub async fn run_cleanup(&self) -> Result<CleanupReport> {
        let now = Utc::now();
        let mut report = CleanupReport {
            news_archived: 0,
            events_archived: 0,
            errors: Vec::new(),
        };

        for post in self.news_repo.list().await? {
            if is_news_active(&post, &self.config, now) {
                continue;
            }
            match self.archive_news(post, now).await {
                Ok(()) => report.news_archived += 1,
                Err((id, e)) => {
                    tracing::warn!("Failed to archive news post {}: {}", id, e);
                    report.errors.push(CleanupError {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }

        for event in self.event_repo.list().await? {
            if is_event_active(&event, &self.config, now) {
                continue;
            }
            match self.archive_event(event, now).await {
                Ok(()) => report.events_archived += 1,
                Err((id, e)) => {
                    tracing::warn!("Failed to archive event {}: {}", id, e);
                    report.errors.push(CleanupError {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Lifecycle cleanup archived {} news posts and {} events ({} errors)",
            report.news_archived,
            report.events_archived,
            report.errors.len()
        );

        Ok(report)
    }

    /// Move an archived item back to its live collection using the stored
    /// snapshot. Returns false (never an error) when the id is unknown,
    /// the snapshot no longer deserializes, or the reinsert is rejected.
    pub async fn restore(&self, id: Uuid) -> Result<bool> {
        let Some(item) = self.archive_repo.find_by_id(id).await? else {
            tracing::warn!("Restore requested for unknown archive id {}", id);
            return Ok(false);
        };

        let restored = match item.item_type {
            ArchivedItemType::News => {
                match serde_json::from_value::<NewsPost>(item.original_data.clone()) {
                    Ok(post) => self.news_repo.create(post).await.map(|_| ()),
                    Err(e) => {
                        tracing::warn!("Archive snapshot for {} is malformed: {}", id, e);
                        return Ok(false);
                    }
                }
            }
            ArchivedItemType::Event => {
                match serde_json::from_value::<CalendarEvent>(item.original_data.clone()) {
                    Ok(event) => self.event_repo.create(event).await.map(|_| ()),
                    Err(e) => {
                        tracing::warn!("Archive snapshot for {} is malformed: {}", id, e);
                        return Ok(false);
                    }
                }
            }
        };

        if let Err(e) = restored {
            tracing::warn!("Failed to reinsert archived item {}: {}", id, e);
            return Ok(false);
        }

        self.archive_repo.delete(id).await?;
        Ok(true)
    }

    async fn archive_news(
        &self,
        post: NewsPost,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), (Uuid, crate::error::AppError)> {
        let id = post.id;
        let snapshot = serde_json::to_value(&post)
            .map_err(|e| (id, crate::error::AppError::Internal(e.to_string())))?;

        let item = ArchivedItem {
            id,
            title: post.title.en.clone(),
            item_type: ArchivedItemType::News,
            archived_at: now,
            reason: "expired".to_string(),
            original_data: snapshot,
        };

        self.archive_repo.create(item).await.map_err(|e| (id, e))?;
        self.news_repo.delete(id).await.map_err(|e| (id, e))?;
        Ok(())
    }

    async fn archive_event(
        &self,
        event: CalendarEvent,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), (Uuid, crate::error::AppError)> {
        let id = event.id;
        let snapshot = serde_json::to_value(&event)
            .map_err(|e| (id, crate::error::AppError::Internal(e.to_string())))?;

        let item = ArchivedItem {
            id,
            title: event.title.en.clone(),
            item_type: ArchivedItemType::Event,
            archived_at: now,
            reason: "past-event".to_string(),
            original_data: snapshot,
        };

        self.archive_repo.create(item).await.map_err(|e| (id, e))?;
        self.event_repo.delete(id).await.map_err(|e| (id, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Localized;
    use chrono::Duration;

    fn post(days_old: i64, urgent: bool) -> NewsPost {
        let now = Utc::now();
        NewsPost {
            id: Uuid::new_v4(),
            slug: "test-post".to_string(),
            title: Localized::new("Test", "Prawf"),
            body: Localized::new("Body", "Corff"),
            // One second of slack so the post is strictly `days_old` days old
            // even though the caller captured its own `Utc::now()` earlier.
            date: now - Duration::days(days_old) - Duration::seconds(1),
            is_urgent: urgent,
            published: true,
            linked_event_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn urgent_post_expires_after_configured_window() {
        let config = ContentConfig::default();
        let now = Utc::now();

        assert!(!should_archive_urgent_alert(&post(7, true), &config, now));
        assert!(should_archive_urgent_alert(&post(8, true), &config, now));
        assert!(!should_archive_urgent_alert(&post(30, false), &config, now));
    }

    #[test]
    fn non_urgent_news_uses_general_retention() {
        let config = ContentConfig::default();
        let now = Utc::now();

        assert!(is_news_active(&post(89, false), &config, now));
        assert!(!is_news_active(&post(91, false), &config, now));
        // Urgent posts expire on the short window instead.
        assert!(!is_news_active(&post(8, true), &config, now));
    }

    #[test]
    fn event_activity_keyed_to_end_or_start() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let mut event = CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("Trip", "Taith"),
            description: Localized::default(),
            start: now - Duration::days(40),
            end: None,
            all_day: false,
            tags: vec![],
            location: None,
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        };

        // Start 40 days back, no end: past the 30-day window.
        assert!(!is_event_active(&event, &config, now));

        // An end inside the window keeps it active.
        event.end = Some(now - Duration::days(10));
        assert!(is_event_active(&event, &config, now));
    }
}
