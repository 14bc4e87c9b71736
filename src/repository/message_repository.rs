use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{InboxMessage, Localized, Notification},
    error::{AppError, Result},
    repository::{MessageRepository, NotificationRepository},
};

#[derive(FromRow)]
struct MessageRow {
    id: String,
    parent_id: String,
    subject: String,
    body: String,
    sent_at: NaiveDateTime,
    read_at: Option<NaiveDateTime>,
}

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    parent_id: Option<String>,
    title_en: String,
    title_cy: String,
    body_en: String,
    body_cy: String,
    created_at: NaiveDateTime,
}

pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: MessageRow) -> Result<InboxMessage> {
        Ok(InboxMessage {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            parent_id: Uuid::parse_str(&row.parent_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            subject: row.subject,
            body: row.body,
            sent_at: DateTime::from_naive_utc_and_offset(row.sent_at, Utc),
            read_at: row
                .read_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
        })
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: InboxMessage) -> Result<InboxMessage> {
        let id_str = message.id.to_string();
        let parent_id_str = message.parent_id.to_string();

        sqlx::query(
            r#"
            INSERT INTO messages (id, parent_id, subject, body, sent_at, read_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&parent_id_str)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.sent_at.naive_utc())
        .bind(message.read_at.map(|dt| dt.naive_utc()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(message.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created message".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InboxMessage>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, parent_id, subject, body, sent_at, read_at FROM messages WHERE id = ?",
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_message(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<InboxMessage>> {
        let parent_id_str = parent_id.to_string();
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, parent_id, subject, body, sent_at, read_at
            FROM messages
            WHERE parent_id = ?
            ORDER BY sent_at DESC
            "#,
        )
        .bind(parent_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_message).collect()
    }

    async fn mark_read(&self, id: Uuid) -> Result<InboxMessage> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query("UPDATE messages SET read_at = COALESCE(read_at, ?) WHERE id = ?")
            .bind(now)
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: NotificationRow) -> Result<Notification> {
        let parent_id = row
            .parent_id
            .as_ref()
            .map(|id| Uuid::parse_str(id))
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Notification {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            parent_id,
            title: Localized::new(row.title_en, row.title_cy),
            body: Localized::new(row.body_en, row.body_cy),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification> {
        let id_str = notification.id.to_string();
        let parent_id_str = notification.parent_id.map(|id| id.to_string());

        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, parent_id, title_en, title_cy, body_en, body_cy, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&parent_id_str)
        .bind(&notification.title.en)
        .bind(&notification.title.cy)
        .bind(&notification.body.en)
        .bind(&notification.body.cy)
        .bind(notification.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(notification)
    }

    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<Notification>> {
        let parent_id_str = parent_id.to_string();
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, parent_id, title_en, title_cy, body_en, body_cy, created_at
            FROM notifications
            WHERE parent_id = ? OR parent_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(parent_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_notification).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
