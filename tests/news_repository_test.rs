use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use ysgol_portal::{
    domain::{CalendarEvent, EventTag, Localized, NewsPost},
    repository::{
        EventRepository, NewsRepository, SqliteEventRepository, SqliteNewsRepository,
    },
};

fn sample_post() -> NewsPost {
    let date = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    NewsPost {
        id: Uuid::new_v4(),
        slug: "autumn-concert".to_string(),
        title: Localized::new("Autumn concert", "Cyngerdd yr hydref"),
        body: Localized::new("Doors open at 6pm.", "Drysau'n agor am 6pm."),
        date,
        is_urgent: false,
        published: true,
        linked_event_id: None,
        attachment_url: None,
        created_at: date,
        updated_at: date,
    }
}

#[tokio::test]
async fn test_news_crud() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteNewsRepository::new(pool.clone());

    // Test Create
    let post = sample_post();
    let created = repo.create(post.clone()).await?;
    assert_eq!(created.slug, "autumn-concert");
    assert_eq!(created.title.cy, "Cyngerdd yr hydref");
    assert_eq!(created.date, post.date);

    // Test Find by ID / slug
    let found = repo.find_by_id(post.id).await?;
    assert!(found.is_some());
    let found_by_slug = repo.find_by_slug("autumn-concert").await?;
    assert_eq!(found_by_slug.unwrap().id, post.id);

    // Test List
    let posts = repo.list().await?;
    assert_eq!(posts.len(), 1);

    // Unpublished posts stay out of the published listing
    let mut draft = sample_post();
    draft.id = Uuid::new_v4();
    draft.slug = "draft-post".to_string();
    draft.published = false;
    repo.create(draft).await?;
    assert_eq!(repo.list().await?.len(), 2);
    assert_eq!(repo.list_published().await?.len(), 1);

    // Test Update
    let mut updated_post = created.clone();
    updated_post.title = Localized::new("Autumn concert (new date)", "");
    updated_post.is_urgent = true;
    let updated = repo.update(post.id, updated_post).await?;
    assert_eq!(updated.title.en, "Autumn concert (new date)");
    assert!(updated.is_urgent);

    // Test Delete
    repo.delete(post.id).await?;
    assert!(repo.find_by_id(post.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_event_crud_and_tag_round_trip() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteEventRepository::new(pool.clone());
    let start = Utc.with_ymd_and_hms(2025, 9, 12, 16, 0, 0).unwrap();

    let event = CalendarEvent {
        id: Uuid::new_v4(),
        title: Localized::new("Parents Evening", "Noson Rieni"),
        description: Localized::new("Ten-minute slots.", ""),
        start,
        end: Some(start + chrono::Duration::hours(3)),
        all_day: false,
        tags: vec![EventTag::ParentsEvening, EventTag::Event],
        location: Some("School hall".to_string()),
        linked_news_id: None,
        attachment_url: None,
        created_at: start,
        updated_at: start,
    };

    let created = repo.create(event.clone()).await?;
    assert_eq!(created.tags, vec![EventTag::ParentsEvening, EventTag::Event]);
    assert_eq!(created.start, start);

    let mut updated_event = created.clone();
    updated_event.tags = vec![EventTag::Trip];
    updated_event.location = None;
    let updated = repo.update(event.id, updated_event).await?;
    assert_eq!(updated.tags, vec![EventTag::Trip]);
    assert!(updated.location.is_none());

    repo.delete(event.id).await?;
    assert!(repo.find_by_id(event.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_feed_listing_skips_malformed_rows() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteEventRepository::new(pool.clone());
    let start = Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap();

    let good = CalendarEvent {
        id: Uuid::new_v4(),
        title: Localized::new("Sports Day", ""),
        description: Localized::default(),
        start,
        end: None,
        all_day: true,
        tags: vec![EventTag::Event],
        location: None,
        linked_news_id: None,
        attachment_url: None,
        created_at: start,
        updated_at: start,
    };
    repo.create(good.clone()).await?;

    // A row with an unparsable date, as a stale import might leave behind.
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
    .bind(start.to_rfc3339())
    .bind(start.to_rfc3339())
    .execute(&pool)
    .await?;

    // Strict listing fails on the bad row...
    assert!(repo.list().await.is_err());

    // ...but the feed listing just drops it.
    let feed_events = repo.list_for_feed().await?;
    assert_eq!(feed_events.len(), 1);
    assert_eq!(feed_events[0].id, good.id);

    Ok(())
}
