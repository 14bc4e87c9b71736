use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Ysgol Bryncelyn Parent Portal API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "News, calendar and family portal for Ysgol Bryncelyn",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "public": "/public",
            "admin": "/admin",
            "calendar_feed": "/public/feed/calendar"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
