use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Localized, NewsPost},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub slug: String,
    pub title: Localized,
    pub body: Localized,
    /// Defaults to now when omitted.
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub published: bool,
    pub linked_event_id: Option<Uuid>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNewsRequest {
    pub slug: Option<String>,
    pub title: Option<Localized>,
    pub body: Option<Localized>,
    pub date: Option<DateTime<Utc>>,
    pub is_urgent: Option<bool>,
    pub published: Option<bool>,
    pub linked_event_id: Option<Option<Uuid>>,
    pub attachment_url: Option<Option<String>>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<NewsPost>>> {
    let posts = state.service_context.news_repo.list().await?;
    Ok(Json(posts))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsPost>> {
    let post = state
        .service_context
        .news_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("News post not found".to_string()))?;

    Ok(Json(post))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> Result<(StatusCode, Json<NewsPost>)> {
    if request.slug.is_empty() {
        return Err(AppError::Validation("Slug must not be empty".to_string()));
    }

    if let Some(existing) = state
        .service_context
        .news_repo
        .find_by_slug(&request.slug)
        .await?
    {
        return Err(AppError::Conflict(format!(
            "Slug already in use by post {}",
            existing.id
        )));
    }

    let now = Utc::now();
    let post = NewsPost {
        id: Uuid::new_v4(),
        slug: request.slug,
        title: request.title,
        body: request.body,
        date: request.date.unwrap_or(now),
        is_urgent: request.is_urgent,
        published: request.published,
        linked_event_id: request.linked_event_id,
        attachment_url: request.attachment_url,
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.news_repo.create(post).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateNewsRequest>,
) -> Result<Json<NewsPost>> {
    let mut post = state
        .service_context
        .news_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("News post not found".to_string()))?;

    if let Some(slug) = request.slug {
        post.slug = slug;
    }
    if let Some(title) = request.title {
        post.title = title;
    }
    if let Some(body) = request.body {
        post.body = body;
    }
    if let Some(date) = request.date {
        post.date = date;
    }
    if let Some(is_urgent) = request.is_urgent {
        post.is_urgent = is_urgent;
    }
    if let Some(published) = request.published {
        post.published = published;
    }
    if let Some(linked_event_id) = request.linked_event_id {
        post.linked_event_id = linked_event_id;
    }
    if let Some(attachment_url) = request.attachment_url {
        post.attachment_url = attachment_url;
    }

    let updated = state.service_context.news_repo.update(id, post).await?;
    Ok(Json(updated))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state
        .service_context
        .news_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("News post not found".to_string()))?;

    state.service_context.news_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
