use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CalendarEvent, EventTag, Localized},
    error::{AppError, Result},
    repository::EventRepository,
};

/// Timestamps are stored as RFC 3339 TEXT and parsed by hand, so the feed
/// path can skip a corrupt row instead of failing the whole fetch.
#[derive(FromRow)]
struct EventRow {
    id: String,
    title_en: String,
    title_cy: String,
    description_en: String,
    description_cy: String,
    start_time: String,
    end_time: Option<String>,
    all_day: i32,
    tags: String,
    location: Option<String>,
    linked_news_id: Option<String>,
    attachment_url: Option<String>,
    created_at: String,
    updated_at: String,
}

const EVENT_COLUMNS: &str = "id, title_en, title_cy, description_en, description_cy, \
     start_time, end_time, all_day, tags, location, linked_news_id, attachment_url, \
     created_at, updated_at";

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::Database(format!("Invalid timestamp '{}': {}", s, e)))
    }

    fn row_to_event(row: EventRow) -> Result<CalendarEvent> {
        let linked_news_id = row
            .linked_news_id
            .as_ref()
            .map(|id| Uuid::parse_str(id))
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(CalendarEvent {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: Localized::new(row.title_en, row.title_cy),
            description: Localized::new(row.description_en, row.description_cy),
            start: Self::parse_timestamp(&row.start_time)?,
            end: row
                .end_time
                .as_deref()
                .map(Self::parse_timestamp)
                .transpose()?,
            all_day: row.all_day != 0,
            tags: Self::parse_tags(&row.tags)?,
            location: row.location,
            linked_news_id,
            attachment_url: row.attachment_url,
            created_at: Self::parse_timestamp(&row.created_at)?,
            updated_at: Self::parse_timestamp(&row.updated_at)?,
        })
    }

    fn parse_tags(s: &str) -> Result<Vec<EventTag>> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::parse_tag)
            .collect()
    }

    fn parse_tag(s: &str) -> Result<EventTag> {
        match s {
            "Holiday" => Ok(EventTag::Holiday),
            "INSET" => Ok(EventTag::Inset),
            "Event" => Ok(EventTag::Event),
            "Trip" => Ok(EventTag::Trip),
            "Parents Evening" => Ok(EventTag::ParentsEvening),
            _ => Err(AppError::Database(format!("Invalid event tag: {}", s))),
        }
    }

    fn tag_to_str(tag: &EventTag) -> &'static str {
        match tag {
            EventTag::Holiday => "Holiday",
            EventTag::Inset => "INSET",
            EventTag::Event => "Event",
            EventTag::Trip => "Trip",
            EventTag::ParentsEvening => "Parents Evening",
        }
    }

    fn tags_to_string(tags: &[EventTag]) -> String {
        tags.iter()
            .map(Self::tag_to_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: CalendarEvent) -> Result<CalendarEvent> {
        let id_str = event.id.to_string();
        let all_day_int = if event.all_day { 1i32 } else { 0i32 };
        let tags_str = Self::tags_to_string(&event.tags);
        let linked_news_id_str = event.linked_news_id.map(|id| id.to_string());

        sqlx::query(
            r#"
            INSERT INTO calendar_events (
                id, title_en, title_cy, description_en, description_cy,
                start_time, end_time, all_day, tags, location, linked_news_id,
                attachment_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&event.title.en)
        .bind(&event.title.cy)
        .bind(&event.description.en)
        .bind(&event.description.cy)
        .bind(event.start.to_rfc3339())
        .bind(event.end.map(|dt| dt.to_rfc3339()))
        .bind(all_day_int)
        .bind(&tags_str)
        .bind(&event.location)
        .bind(&linked_news_id_str)
        .bind(&event.attachment_url)
        .bind(event.created_at.to_rfc3339())
        .bind(event.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(event.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created event".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?"
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_event(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<CalendarEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events ORDER BY start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn list_upcoming(&self, limit: i64) -> Result<Vec<CalendarEvent>> {
        let now_str = Utc::now().to_rfc3339();
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events \
             WHERE COALESCE(end_time, start_time) >= ? \
             ORDER BY start_time ASC LIMIT ?"
        ))
        .bind(now_str)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn list_for_feed(&self) -> Result<Vec<CalendarEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events ORDER BY start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        // One bad row must not take the whole feed down.
        let events = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match Self::row_to_event(row) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!("Skipping malformed event {} in feed: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        Ok(events)
    }

    async fn update(&self, id: Uuid, event: CalendarEvent) -> Result<CalendarEvent> {
        let id_str = id.to_string();
        let all_day_int = if event.all_day { 1i32 } else { 0i32 };
        let tags_str = Self::tags_to_string(&event.tags);
        let linked_news_id_str = event.linked_news_id.map(|id| id.to_string());
        let now_str = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE calendar_events
            SET title_en = ?, title_cy = ?, description_en = ?, description_cy = ?,
                start_time = ?, end_time = ?, all_day = ?, tags = ?, location = ?,
                linked_news_id = ?, attachment_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title.en)
        .bind(&event.title.cy)
        .bind(&event.description.en)
        .bind(&event.description.cy)
        .bind(event.start.to_rfc3339())
        .bind(event.end.map(|dt| dt.to_rfc3339()))
        .bind(all_day_int)
        .bind(&tags_str)
        .bind(&event.location)
        .bind(&linked_news_id_str)
        .bind(&event.attachment_url)
        .bind(&now_str)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated event".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM calendar_events WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
