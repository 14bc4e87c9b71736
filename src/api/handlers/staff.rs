use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Localized, StaffMember},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub role: Localized,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub role: Option<Localized>,
    pub email: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<StaffMember>>> {
    let staff = state.service_context.staff_repo.list().await?;
    Ok(Json(staff))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffMember>> {
    let member = state
        .service_context
        .staff_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;

    Ok(Json(member))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffMember>)> {
    let now = Utc::now();
    let member = StaffMember {
        id: Uuid::new_v4(),
        name: request.name,
        role: request.role,
        email: request.email,
        photo_url: request.photo_url,
        sort_order: request.sort_order,
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.staff_repo.create(member).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<StaffMember>> {
    let mut member = state
        .service_context
        .staff_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;

    if let Some(name) = request.name {
        member.name = name;
    }
    if let Some(role) = request.role {
        member.role = role;
    }
    if let Some(email) = request.email {
        member.email = email;
    }
    if let Some(photo_url) = request.photo_url {
        member.photo_url = photo_url;
    }
    if let Some(sort_order) = request.sort_order {
        member.sort_order = sort_order;
    }

    let updated = state.service_context.staff_repo.update(id, member).await?;
    Ok(Json(updated))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state
        .service_context
        .staff_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;

    state.service_context.staff_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
