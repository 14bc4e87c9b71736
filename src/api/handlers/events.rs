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
    domain::{CalendarEvent, EventTag, Localized},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Localized,
    #[serde(default)]
    pub description: Localized,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub tags: Vec<EventTag>,
    pub location: Option<String>,
    pub linked_news_id: Option<Uuid>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<Localized>,
    pub description: Option<Localized>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<Option<DateTime<Utc>>>,
    pub all_day: Option<bool>,
    pub tags: Option<Vec<EventTag>>,
    pub location: Option<Option<String>>,
    pub linked_news_id: Option<Option<Uuid>>,
    pub attachment_url: Option<Option<String>>,
}

fn check_times(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<()> {
    if let Some(end) = end {
        if end < start {
            return Err(AppError::Validation(
                "Event end must not precede its start".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CalendarEvent>>> {
    let events = state.service_context.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarEvent>> {
    let event = state
        .service_context
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(event))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CalendarEvent>)> {
    check_times(request.start, request.end)?;

    let now = Utc::now();
    let event = CalendarEvent {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        start: request.start,
        end: request.end,
        all_day: request.all_day,
        tags: request.tags,
        location: request.location,
        linked_news_id: request.linked_news_id,
        attachment_url: request.attachment_url,
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.event_repo.create(event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<CalendarEvent>> {
    let mut event = state
        .service_context
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if let Some(title) = request.title {
        event.title = title;
    }
    if let Some(description) = request.description {
        event.description = description;
    }
    if let Some(start) = request.start {
        event.start = start;
    }
    if let Some(end) = request.end {
        event.end = end;
    }
    if let Some(all_day) = request.all_day {
        event.all_day = all_day;
    }
    if let Some(tags) = request.tags {
        event.tags = tags;
    }
    if let Some(location) = request.location {
        event.location = location;
    }
    if let Some(linked_news_id) = request.linked_news_id {
        event.linked_news_id = linked_news_id;
    }
    if let Some(attachment_url) = request.attachment_url {
        event.attachment_url = attachment_url;
    }

    check_times(event.start, event.end)?;

    let updated = state.service_context.event_repo.update(id, event).await?;
    Ok(Json(updated))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state
        .service_context
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    state.service_context.event_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
