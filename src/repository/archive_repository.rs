use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{ArchivedItem, ArchivedItemType},
    error::{AppError, Result},
    repository::ArchiveRepository,
};

#[derive(FromRow)]
struct ArchivedItemRow {
    id: String,
    title: String,
    item_type: String,
    archived_at: NaiveDateTime,
    reason: String,
    original_data: String,
}

pub struct SqliteArchiveRepository {
    pool: SqlitePool,
}

impl SqliteArchiveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_item(row: ArchivedItemRow) -> Result<ArchivedItem> {
        Ok(ArchivedItem {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            item_type: Self::parse_item_type(&row.item_type)?,
            archived_at: DateTime::from_naive_utc_and_offset(row.archived_at, Utc),
            reason: row.reason,
            original_data: serde_json::from_str(&row.original_data)
                .map_err(|e| AppError::Database(format!("Corrupt archive snapshot: {}", e)))?,
        })
    }

    fn parse_item_type(s: &str) -> Result<ArchivedItemType> {
        match s {
            "news" => Ok(ArchivedItemType::News),
            "event" => Ok(ArchivedItemType::Event),
            _ => Err(AppError::Database(format!("Invalid archive item type: {}", s))),
        }
    }

    fn item_type_to_str(item_type: &ArchivedItemType) -> &'static str {
        match item_type {
            ArchivedItemType::News => "news",
            ArchivedItemType::Event => "event",
        }
    }
}

#[async_trait]
impl ArchiveRepository for SqliteArchiveRepository {
    async fn create(&self, item: ArchivedItem) -> Result<ArchivedItem> {
        let id_str = item.id.to_string();
        let item_type_str = Self::item_type_to_str(&item.item_type);
        let original_data_str = serde_json::to_string(&item.original_data)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO archived_items (
                id, title, item_type, archived_at, reason, original_data
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&item.title)
        .bind(item_type_str)
        .bind(item.archived_at.naive_utc())
        .bind(&item.reason)
        .bind(&original_data_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArchivedItem>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ArchivedItemRow>(
            r#"
            SELECT id, title, item_type, archived_at, reason, original_data
            FROM archived_items
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_item(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<ArchivedItem>> {
        let rows = sqlx::query_as::<_, ArchivedItemRow>(
            r#"
            SELECT id, title, item_type, archived_at, reason, original_data
            FROM archived_items
            ORDER BY archived_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM archived_items WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
