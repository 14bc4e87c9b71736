use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::ArchivedItem,
    error::Result,
    service::lifecycle_service::CleanupReport,
};

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub restored: bool,
}

pub async fn run_cleanup(State(state): State<AppState>) -> Result<Json<CleanupReport>> {
    let report = state
        .service_context
        .lifecycle_service
        .run_cleanup()
        .await?;
    Ok(Json(report))
}

pub async fn list_archive(State(state): State<AppState>) -> Result<Json<Vec<ArchivedItem>>> {
    let items = state.service_context.archive_repo.list().await?;
    Ok(Json(items))
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RestoreResponse>> {
    let restored = state.service_context.lifecycle_service.restore(id).await?;
    Ok(Json(RestoreResponse { restored }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let ctx = &state.service_context;
    let news = ctx.news_repo.list().await?.len();
    let events = ctx.event_repo.list().await?.len();
    let archived = ctx.archive_repo.list().await?.len();
    let staff = ctx.staff_repo.list().await?.len();
    let parents = ctx.parent_repo.list().await?.len();

    Ok(Json(json!({
        "news_posts": news,
        "calendar_events": events,
        "archived_items": archived,
        "staff": staff,
        "parents": parents,
    })))
}
