use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Child, Parent},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub class_name: String,
    pub date_of_birth: Option<NaiveDate>,
}

pub async fn list_parents(State(state): State<AppState>) -> Result<Json<Vec<Parent>>> {
    let parents = state.service_context.parent_repo.list().await?;
    Ok(Json(parents))
}

pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Parent>> {
    let parent = state
        .service_context
        .parent_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent not found".to_string()))?;

    Ok(Json(parent))
}

pub async fn create_parent(
    State(state): State<AppState>,
    Json(request): Json<CreateParentRequest>,
) -> Result<(StatusCode, Json<Parent>)> {
    if !request.email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    if state
        .service_context
        .parent_repo
        .find_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let now = Utc::now();
    let parent = Parent {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.parent_repo.create(parent).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .parent_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent not found".to_string()))?;

    state.service_context.parent_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_children(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Vec<Child>>> {
    let children = state
        .service_context
        .child_repo
        .list_for_parent(parent_id)
        .await?;
    Ok(Json(children))
}

pub async fn create_child(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Json(request): Json<CreateChildRequest>,
) -> Result<(StatusCode, Json<Child>)> {
    state
        .service_context
        .parent_repo
        .find_by_id(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent not found".to_string()))?;

    let now = Utc::now();
    let child = Child {
        id: Uuid::new_v4(),
        parent_id,
        name: request.name,
        class_name: request.class_name,
        date_of_birth: request.date_of_birth,
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.child_repo.create(child).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_child(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .child_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Child not found".to_string()))?;

    state.service_context.child_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
