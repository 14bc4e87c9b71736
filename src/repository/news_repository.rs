use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Localized, NewsPost},
    error::{AppError, Result},
    repository::NewsRepository,
};

#[derive(FromRow)]
struct NewsRow {
    id: String,
    slug: String,
    title_en: String,
    title_cy: String,
    body_en: String,
    body_cy: String,
    date: NaiveDateTime,
    is_urgent: i32,
    published: i32,
    linked_event_id: Option<String>,
    attachment_url: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const NEWS_COLUMNS: &str = "id, slug, title_en, title_cy, body_en, body_cy, date, \
     is_urgent, published, linked_event_id, attachment_url, created_at, updated_at";

pub struct SqliteNewsRepository {
    pool: SqlitePool,
}

impl SqliteNewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: NewsRow) -> Result<NewsPost> {
        let linked_event_id = row
            .linked_event_id
            .as_ref()
            .map(|id| Uuid::parse_str(id))
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(NewsPost {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            slug: row.slug,
            title: Localized::new(row.title_en, row.title_cy),
            body: Localized::new(row.body_en, row.body_cy),
            date: DateTime::from_naive_utc_and_offset(row.date, Utc),
            is_urgent: row.is_urgent != 0,
            published: row.published != 0,
            linked_event_id,
            attachment_url: row.attachment_url,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl NewsRepository for SqliteNewsRepository {
    async fn create(&self, post: NewsPost) -> Result<NewsPost> {
        let id_str = post.id.to_string();
        let is_urgent_int = if post.is_urgent { 1i32 } else { 0i32 };
        let published_int = if post.published { 1i32 } else { 0i32 };
        let linked_event_id_str = post.linked_event_id.map(|id| id.to_string());

        sqlx::query(
            r#"
            INSERT INTO news_posts (
                id, slug, title_en, title_cy, body_en, body_cy, date,
                is_urgent, published, linked_event_id, attachment_url,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&post.slug)
        .bind(&post.title.en)
        .bind(&post.title.cy)
        .bind(&post.body.en)
        .bind(&post.body.cy)
        .bind(post.date.naive_utc())
        .bind(is_urgent_int)
        .bind(published_int)
        .bind(&linked_event_id_str)
        .bind(&post.attachment_url)
        // Timestamps come from the entity so archive restores keep their
        // original history.
        .bind(post.created_at.naive_utc())
        .bind(post.updated_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(post.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created news post".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NewsPost>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news_posts WHERE id = ?"
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_post(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<NewsPost>> {
        let row = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news_posts WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_post(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<NewsPost>> {
        let rows = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news_posts ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_post).collect()
    }

    async fn list_published(&self) -> Result<Vec<NewsPost>> {
        let rows = sqlx::query_as::<_, NewsRow>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news_posts WHERE published = 1 ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_post).collect()
    }

    async fn update(&self, id: Uuid, post: NewsPost) -> Result<NewsPost> {
        let id_str = id.to_string();
        let is_urgent_int = if post.is_urgent { 1i32 } else { 0i32 };
        let published_int = if post.published { 1i32 } else { 0i32 };
        let linked_event_id_str = post.linked_event_id.map(|id| id.to_string());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE news_posts
            SET slug = ?, title_en = ?, title_cy = ?, body_en = ?, body_cy = ?,
                date = ?, is_urgent = ?, published = ?, linked_event_id = ?,
                attachment_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.slug)
        .bind(&post.title.en)
        .bind(&post.title.cy)
        .bind(&post.body.en)
        .bind(&post.body.cy)
        .bind(post.date.naive_utc())
        .bind(is_urgent_int)
        .bind(published_int)
        .bind(&linked_event_id_str)
        .bind(&post.attachment_url)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated news post".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM news_posts WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
