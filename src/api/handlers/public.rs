use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{CalendarEvent, HomepageContent, NewsPost},
    error::{AppError, Result},
    feed::ical,
    service::lifecycle_service::{is_event_active, is_news_active},
};

#[derive(Debug, Deserialize)]
pub struct PublicEventsQuery {
    pub limit: Option<i64>,
}

pub async fn homepage(State(state): State<AppState>) -> Result<Json<HomepageContent>> {
    let content = state
        .service_context
        .homepage_service
        .homepage_content()
        .await?;
    Ok(Json(content))
}

pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsPost>>> {
    let config = state.service_context.lifecycle_service.config();
    let now = Utc::now();

    let posts = state
        .service_context
        .news_repo
        .list_published()
        .await?
        .into_iter()
        .filter(|p| is_news_active(p, config, now))
        .collect::<Vec<_>>();

    Ok(Json(posts))
}

pub async fn get_news_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NewsPost>> {
    let post = state
        .service_context
        .news_repo
        .find_by_slug(&slug)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| AppError::NotFound("News post not found".to_string()))?;

    Ok(Json(post))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PublicEventsQuery>,
) -> Result<Json<Vec<CalendarEvent>>> {
    let config = state.service_context.lifecycle_service.config();
    let now = Utc::now();
    let limit = params.limit.unwrap_or(50).clamp(1, 200);

    let events = state
        .service_context
        .event_repo
        .list_upcoming(limit)
        .await?
        .into_iter()
        .filter(|e| is_event_active(e, config, now))
        .collect::<Vec<_>>();

    Ok(Json(events))
}

pub async fn list_staff(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::domain::StaffMember>>> {
    let staff = state.service_context.staff_repo.list().await?;
    Ok(Json(staff))
}

/// Live iCalendar feed. Degrades to a plain 500 rather than emitting a
/// malformed calendar when the store is unreachable.
pub async fn calendar_feed(State(state): State<AppState>) -> Response {
    let events = match state.service_context.event_repo.list_for_feed().await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Calendar feed data fetch failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "Calendar feed temporarily unavailable",
            )
                .into_response();
        }
    };

    let body = ical::calendar_feed(&events, &state.settings.feed, Utc::now());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response()
}

/// CORS preflight for calendar clients fetching the feed cross-origin.
pub async fn calendar_feed_preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// Single-event .ics download for "add to calendar" buttons.
pub async fn event_ics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let event = state
        .service_context
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let body = ical::single_event(&event, &state.settings.feed, Utc::now())?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"event-{}.ics\"", event.id),
            ),
        ],
        body,
    )
        .into_response())
}
