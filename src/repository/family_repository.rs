use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Child, Parent},
    error::{AppError, Result},
    repository::{ChildRepository, ParentRepository},
};

#[derive(FromRow)]
struct ParentRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct ChildRow {
    id: String,
    parent_id: String,
    name: String,
    class_name: String,
    date_of_birth: Option<NaiveDate>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteParentRepository {
    pool: SqlitePool,
}

impl SqliteParentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_parent(row: ParentRow) -> Result<Parent> {
        Ok(Parent {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ParentRepository for SqliteParentRepository {
    async fn create(&self, parent: Parent) -> Result<Parent> {
        let id_str = parent.id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO parents (id, name, email, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&parent.name)
        .bind(&parent.email)
        .bind(&parent.phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(parent.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created parent".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Parent>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ParentRow>(
            "SELECT id, name, email, phone, created_at, updated_at FROM parents WHERE id = ?",
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_parent(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Parent>> {
        let row = sqlx::query_as::<_, ParentRow>(
            "SELECT id, name, email, phone, created_at, updated_at FROM parents WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_parent(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Parent>> {
        let rows = sqlx::query_as::<_, ParentRow>(
            "SELECT id, name, email, phone, created_at, updated_at FROM parents ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_parent).collect()
    }

    async fn update(&self, id: Uuid, parent: Parent) -> Result<Parent> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            "UPDATE parents SET name = ?, email = ?, phone = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&parent.name)
        .bind(&parent.email)
        .bind(&parent.phone)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated parent".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM parents WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

pub struct SqliteChildRepository {
    pool: SqlitePool,
}

impl SqliteChildRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_child(row: ChildRow) -> Result<Child> {
        Ok(Child {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            parent_id: Uuid::parse_str(&row.parent_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            class_name: row.class_name,
            date_of_birth: row.date_of_birth,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ChildRepository for SqliteChildRepository {
    async fn create(&self, child: Child) -> Result<Child> {
        let id_str = child.id.to_string();
        let parent_id_str = child.parent_id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO children (
                id, parent_id, name, class_name, date_of_birth, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&parent_id_str)
        .bind(&child.name)
        .bind(&child.class_name)
        .bind(child.date_of_birth)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(child.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created child".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Child>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ChildRow>(
            r#"
            SELECT id, parent_id, name, class_name, date_of_birth, created_at, updated_at
            FROM children
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_child(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<Child>> {
        let parent_id_str = parent_id.to_string();
        let rows = sqlx::query_as::<_, ChildRow>(
            r#"
            SELECT id, parent_id, name, class_name, date_of_birth, created_at, updated_at
            FROM children
            WHERE parent_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(parent_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_child).collect()
    }

    async fn update(&self, id: Uuid, child: Child) -> Result<Child> {
        let id_str = id.to_string();
        let parent_id_str = child.parent_id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE children
            SET parent_id = ?, name = ?, class_name = ?, date_of_birth = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&parent_id_str)
        .bind(&child.name)
        .bind(&child.class_name)
        .bind(child.date_of_birth)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated child".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
