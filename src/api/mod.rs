pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // API routes
        .nest("/api", api_routes())
        // Public routes (consumed by the marketing site and calendar clients)
        .nest("/public", public_routes())
        // Admin routes
        .nest("/admin", admin_routes())
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/news", news_routes())
        .nest("/events", event_routes())
        .nest("/staff", staff_routes())
        .nest("/parents", parent_routes())
        .nest("/messages", message_routes())
        .nest("/notifications", notification_routes())
}

fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::news::list))
        .route("/", post(handlers::news::create))
        .route("/:id", get(handlers::news::get))
        .route("/:id", put(handlers::news::update))
        .route("/:id", axum::routing::delete(handlers::news::delete))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::events::list))
        .route("/", post(handlers::events::create))
        .route("/:id", get(handlers::events::get))
        .route("/:id", put(handlers::events::update))
        .route("/:id", axum::routing::delete(handlers::events::delete))
}

fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::staff::list))
        .route("/", post(handlers::staff::create))
        .route("/:id", get(handlers::staff::get))
        .route("/:id", put(handlers::staff::update))
        .route("/:id", axum::routing::delete(handlers::staff::delete))
}

fn parent_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::families::list_parents))
        .route("/", post(handlers::families::create_parent))
        .route("/:id", get(handlers::families::get_parent))
        .route("/:id", axum::routing::delete(handlers::families::delete_parent))
        .route("/:id/children", get(handlers::families::list_children))
        .route("/:id/children", post(handlers::families::create_child))
        .route(
            "/children/:id",
            axum::routing::delete(handlers::families::delete_child),
        )
        .route(
            "/:id/notifications",
            get(handlers::messages::list_notifications),
        )
        .route("/:id/messages", get(handlers::messages::list_for_parent))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::messages::send))
        .route("/:id/read", post(handlers::messages::mark_read))
        .route("/:id", axum::routing::delete(handlers::messages::delete))
}

fn notification_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::messages::create_notification))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/homepage", get(handlers::public::homepage))
        .route("/news", get(handlers::public::list_news))
        .route("/news/:slug", get(handlers::public::get_news_by_slug))
        .route("/events", get(handlers::public::list_events))
        .route("/events/:id/ical", get(handlers::public::event_ics))
        .route("/staff", get(handlers::public::list_staff))
        // The feed handles its own CORS preflight; any other method falls
        // through to axum's 405.
        .route(
            "/feed/calendar",
            get(handlers::public::calendar_feed)
                .options(handlers::public::calendar_feed_preflight),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/lifecycle/cleanup", post(handlers::admin::run_cleanup))
        .route("/archive", get(handlers::admin::list_archive))
        .route("/archive/:id/restore", post(handlers::admin::restore))
}
