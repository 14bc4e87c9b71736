use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Localized, StaffMember},
    error::{AppError, Result},
    repository::StaffRepository,
};

#[derive(FromRow)]
struct StaffRow {
    id: String,
    name: String,
    role_en: String,
    role_cy: String,
    email: Option<String>,
    photo_url: Option<String>,
    sort_order: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteStaffRepository {
    pool: SqlitePool,
}

impl SqliteStaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: StaffRow) -> Result<StaffMember> {
        Ok(StaffMember {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            role: Localized::new(row.role_en, row.role_cy),
            email: row.email,
            photo_url: row.photo_url,
            sort_order: row.sort_order,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl StaffRepository for SqliteStaffRepository {
    async fn create(&self, member: StaffMember) -> Result<StaffMember> {
        let id_str = member.id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO staff (
                id, name, role_en, role_cy, email, photo_url, sort_order,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&member.name)
        .bind(&member.role.en)
        .bind(&member.role.cy)
        .bind(&member.email)
        .bind(&member.photo_url)
        .bind(member.sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(member.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created staff member".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffMember>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, name, role_en, role_cy, email, photo_url, sort_order,
                   created_at, updated_at
            FROM staff
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, name, role_en, role_cy, email, photo_url, sort_order,
                   created_at, updated_at
            FROM staff
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_member).collect()
    }

    async fn update(&self, id: Uuid, member: StaffMember) -> Result<StaffMember> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE staff
            SET name = ?, role_en = ?, role_cy = ?, email = ?, photo_url = ?,
                sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.role.en)
        .bind(&member.role.cy)
        .bind(&member.email)
        .bind(&member.photo_url)
        .bind(member.sort_order)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated staff member".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
