use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use ysgol_portal::{
    api,
    config::Settings,
    domain::{CalendarEvent, EventTag, Localized, NewsPost},
    service::ServiceContext,
};

async fn setup_app() -> anyhow::Result<(Router, Arc<ServiceContext>)> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let settings = Arc::new(Settings::default());
    let service_context = Arc::new(ServiceContext::new(pool, settings.content.clone()));
    let app = api::create_app(service_context.clone(), settings);

    Ok((app, service_context))
}

fn event(title: &str, days_ahead: i64) -> CalendarEvent {
    let start = Utc::now() + Duration::days(days_ahead);
    CalendarEvent {
        id: Uuid::new_v4(),
        title: Localized::new(title, ""),
        description: Localized::new("Details to follow.", ""),
        start,
        end: Some(start + Duration::hours(2)),
        all_day: false,
        tags: vec![EventTag::Event],
        location: Some("Main hall".to_string()),
        linked_news_id: None,
        attachment_url: None,
        created_at: start,
        updated_at: start,
    }
}

fn news(slug: &str, days_old: i64, urgent: bool) -> NewsPost {
    let date = Utc::now() - Duration::days(days_old);
    NewsPost {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: Localized::new("Post", "Neges"),
        body: Localized::new("Body", "Corff"),
        date,
        is_urgent: urgent,
        published: true,
        linked_event_id: None,
        attachment_url: None,
        created_at: date,
        updated_at: date,
    }
}

async fn body_string(response: axum::response::Response) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

#[tokio::test]
async fn test_calendar_feed_endpoint() -> anyhow::Result<()> {
    let (app, ctx) = setup_app().await?;

    ctx.event_repo.create(event("Sports Day", 5)).await?;
    ctx.event_repo.create(event("School Trip", 12)).await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/feed/calendar")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(
        headers.get("content-type").unwrap(),
        "text/calendar; charset=utf-8"
    );
    assert_eq!(headers.get("cache-control").unwrap(), "public, max-age=3600");

    let body = body_string(response).await?;
    assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(body.ends_with("END:VCALENDAR\r\n"));
    assert!(body.contains("SUMMARY:Sports Day"));
    assert!(body.contains("SUMMARY:School Trip"));
    assert!(body.contains("X-WR-CALNAME:Ysgol Bryncelyn"));

    // Every line is CRLF-terminated with no blank lines in between.
    for line in body.split("\r\n") {
        assert!(!line.contains('\n'));
    }
    assert!(!body.contains("\r\n\r\n"));

    Ok(())
}

#[tokio::test]
async fn test_calendar_feed_skips_malformed_event() -> anyhow::Result<()> {
    let (app, ctx) = setup_app().await?;

    ctx.event_repo.create(event("Sports Day", 5)).await?;

    // A corrupt row left behind by a bad import must not break the feed.
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO calendar_events (
            id, title_en, title_cy, description_en, description_cy,
            start_time, end_time, all_day, tags, location, linked_news_id,
            attachment_url, created_at, updated_at
        ) VALUES (?, 'Broken', '', '', '', 'not-a-date', NULL, 0, '', NULL, NULL, NULL, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&now)
    .bind(&now)
    .execute(&ctx.db_pool)
    .await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/feed/calendar")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await?;
    assert!(body.contains("SUMMARY:Sports Day"));
    assert!(!body.contains("Broken"));

    Ok(())
}

#[tokio::test]
async fn test_calendar_feed_preflight_and_method_not_allowed() -> anyhow::Result<()> {
    let (app, _ctx) = setup_app().await?;

    let preflight = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/public/feed/calendar")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(
        preflight
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );

    let post = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/public/feed/calendar")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

#[tokio::test]
async fn test_homepage_surfaces_urgent_alert() -> anyhow::Result<()> {
    let (app, ctx) = setup_app().await?;

    ctx.news_repo.create(news("closure", 0, true)).await?;
    ctx.news_repo.create(news("newsletter", 2, false)).await?;
    ctx.event_repo.create(event("Parents Evening", 3)).await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/homepage")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
    assert_eq!(body["urgent_alert"]["slug"], "closure");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // The urgent post is the banner, never an ordinary list item.
    assert!(items.iter().all(|i| i["kind"] != "news"
        || i["post"]["slug"] != "closure"));

    assert_eq!(body["stats"]["urgent_alerts"], 1);

    Ok(())
}

#[tokio::test]
async fn test_unpublished_news_is_hidden() -> anyhow::Result<()> {
    let (app, ctx) = setup_app().await?;

    let mut draft = news("draft", 0, false);
    draft.published = false;
    ctx.news_repo.create(draft).await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/news/draft")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_admin_cleanup_and_restore_flow() -> anyhow::Result<()> {
    let (app, ctx) = setup_app().await?;

    let stale = ctx.news_repo.create(news("stale", 120, false)).await?;

    let cleanup = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/lifecycle/cleanup")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(cleanup.status(), StatusCode::OK);
    let report: serde_json::Value = serde_json::from_str(&body_string(cleanup).await?)?;
    assert_eq!(report["news_archived"], 1);

    let archive = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/archive")
                .body(Body::empty())?,
        )
        .await?;
    let archived: serde_json::Value = serde_json::from_str(&body_string(archive).await?)?;
    assert_eq!(archived.as_array().unwrap().len(), 1);

    let restore = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/admin/archive/{}/restore", stale.id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(restore.status(), StatusCode::OK);
    let restored: serde_json::Value = serde_json::from_str(&body_string(restore).await?)?;
    assert_eq!(restored["restored"], true);
    assert!(ctx.news_repo.find_by_id(stale.id).await?.is_some());

    Ok(())
}
