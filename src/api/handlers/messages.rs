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
    domain::{InboxMessage, Localized, Notification},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub parent_id: Uuid,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    /// Omit for a broadcast to every parent.
    pub parent_id: Option<Uuid>,
    pub title: Localized,
    pub body: Localized,
}

pub async fn list_for_parent(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Vec<InboxMessage>>> {
    let messages = state
        .service_context
        .message_repo
        .list_for_parent(parent_id)
        .await?;
    Ok(Json(messages))
}

pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<InboxMessage>)> {
    state
        .service_context
        .parent_repo
        .find_by_id(request.parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent not found".to_string()))?;

    let message = InboxMessage {
        id: Uuid::new_v4(),
        parent_id: request.parent_id,
        subject: request.subject,
        body: request.body,
        sent_at: Utc::now(),
        read_at: None,
    };

    let created = state.service_context.message_repo.create(message).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InboxMessage>> {
    let message = state.service_context.message_repo.mark_read(id).await?;
    Ok(Json(message))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state
        .service_context
        .message_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

    state.service_context.message_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .service_context
        .notification_repo
        .list_for_parent(parent_id)
        .await?;
    Ok(Json(notifications))
}

pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>)> {
    if let Some(parent_id) = request.parent_id {
        state
            .service_context
            .parent_repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Parent not found".to_string()))?;
    }

    let notification = Notification {
        id: Uuid::new_v4(),
        parent_id: request.parent_id,
        title: request.title,
        body: request.body,
        created_at: Utc::now(),
    };

    let created = state
        .service_context
        .notification_repo
        .create(notification)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
