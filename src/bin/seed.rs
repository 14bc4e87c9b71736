use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use ysgol_portal::{
    domain::{
        CalendarEvent, Child, EventTag, InboxMessage, Localized, NewsPost, Notification, Parent,
        StaffMember,
    },
    repository::{
        ChildRepository, EventRepository, MessageRepository, NewsRepository,
        NotificationRepository, ParentRepository, SqliteChildRepository, SqliteEventRepository,
        SqliteMessageRepository, SqliteNewsRepository, SqliteNotificationRepository,
        SqliteParentRepository, SqliteStaffRepository, StaffRepository,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:ysgol-portal.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let news_repo = SqliteNewsRepository::new(db_pool.clone());
    let event_repo = SqliteEventRepository::new(db_pool.clone());
    let staff_repo = SqliteStaffRepository::new(db_pool.clone());
    let parent_repo = SqliteParentRepository::new(db_pool.clone());
    let child_repo = SqliteChildRepository::new(db_pool.clone());
    let message_repo = SqliteMessageRepository::new(db_pool.clone());
    let notification_repo = SqliteNotificationRepository::new(db_pool.clone());

    let now = Utc::now();

    println!("🏫 Creating staff...");

    staff_repo
        .create(StaffMember {
            id: Uuid::new_v4(),
            name: "Mrs. Eleri Hughes".to_string(),
            role: Localized::new("Headteacher", "Pennaeth"),
            email: Some("pennaeth@ysgolbryncelyn.cymru".to_string()),
            photo_url: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        })
        .await?;

    staff_repo
        .create(StaffMember {
            id: Uuid::new_v4(),
            name: "Mr. Dafydd Price".to_string(),
            role: Localized::new("Deputy Headteacher", "Dirprwy Bennaeth"),
            email: Some("d.price@ysgolbryncelyn.cymru".to_string()),
            photo_url: None,
            sort_order: 1,
            created_at: now,
            updated_at: now,
        })
        .await?;

    staff_repo
        .create(StaffMember {
            id: Uuid::new_v4(),
            name: "Miss Catrin Evans".to_string(),
            role: Localized::new("Year 3 Teacher", "Athrawes Blwyddyn 3"),
            email: None,
            photo_url: None,
            sort_order: 2,
            created_at: now,
            updated_at: now,
        })
        .await?;

    println!("  ✅ Created 3 staff members");

    println!("📅 Creating events...");

    let parents_evening = event_repo
        .create(CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("Parents Evening", "Noson Rieni"),
            description: Localized::new(
                "Book a ten-minute slot with your child's class teacher.",
                "Archebwch slot deng munud gydag athro dosbarth eich plentyn.",
            ),
            start: now + Duration::days(2),
            end: Some(now + Duration::days(2) + Duration::hours(3)),
            all_day: false,
            tags: vec![EventTag::ParentsEvening],
            location: Some("School hall".to_string()),
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    event_repo
        .create(CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("INSET Day", "Diwrnod HMS"),
            description: Localized::new("School closed to pupils for staff training.", ""),
            start: now + Duration::days(10),
            end: None,
            all_day: true,
            tags: vec![EventTag::Inset],
            location: None,
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    event_repo
        .create(CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("Year 6 Trip to St Fagans", "Taith Blwyddyn 6 i Sain Ffagan"),
            description: Localized::new(
                "Coaches leave at 9am sharp.\nPacked lunch required.",
                "",
            ),
            start: now + Duration::days(20),
            end: Some(now + Duration::days(20) + Duration::hours(7)),
            all_day: false,
            tags: vec![EventTag::Trip],
            location: Some("St Fagans National Museum".to_string()),
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    event_repo
        .create(CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("Half Term", "Hanner Tymor"),
            description: Localized::default(),
            start: now + Duration::days(35),
            end: Some(now + Duration::days(42)),
            all_day: true,
            tags: vec![EventTag::Holiday],
            location: None,
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    println!("  ✅ Created 4 events");

    println!("📰 Creating news posts...");

    news_repo
        .create(NewsPost {
            id: Uuid::new_v4(),
            slug: "school-closed-tomorrow".to_string(),
            title: Localized::new(
                "School closed tomorrow due to burst water main",
                "Ysgol ar gau yfory oherwydd prif bibell ddŵr wedi byrstio",
            ),
            body: Localized::new(
                "Dwr Cymru expect repairs to finish overnight. Check back for updates.",
                "",
            ),
            date: now,
            is_urgent: true,
            published: true,
            linked_event_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    news_repo
        .create(NewsPost {
            id: Uuid::new_v4(),
            slug: "parents-evening-booking-open".to_string(),
            title: Localized::new("Parents Evening booking now open", "Archebu Noson Rieni ar agor"),
            body: Localized::new("Slots fill quickly, book early.", ""),
            date: now - Duration::days(1),
            is_urgent: false,
            published: true,
            linked_event_id: Some(parents_evening.id),
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    news_repo
        .create(NewsPost {
            id: Uuid::new_v4(),
            slug: "summer-fair-thanks".to_string(),
            title: Localized::new("Thank you from the summer fair", "Diolch o'r ffair haf"),
            body: Localized::new("The PTA raised over £1,200 for new library books.", ""),
            date: now - Duration::days(80),
            is_urgent: false,
            published: true,
            linked_event_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    println!("  ✅ Created 3 news posts");

    println!("👪 Creating families...");

    let parent = parent_repo
        .create(Parent {
            id: Uuid::new_v4(),
            name: "Sioned Williams".to_string(),
            email: "sioned@example.com".to_string(),
            phone: Some("07700 900123".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await?;

    child_repo
        .create(Child {
            id: Uuid::new_v4(),
            parent_id: parent.id,
            name: "Gwen Williams".to_string(),
            class_name: "Dosbarth 3".to_string(),
            date_of_birth: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    message_repo
        .create(InboxMessage {
            id: Uuid::new_v4(),
            parent_id: parent.id,
            subject: "Gwen's reading diary".to_string(),
            body: "Please remember to sign the reading diary this week.".to_string(),
            sent_at: now,
            read_at: None,
        })
        .await?;

    notification_repo
        .create(Notification {
            id: Uuid::new_v4(),
            parent_id: None,
            title: Localized::new("New term dates published", "Dyddiadau tymor newydd"),
            body: Localized::new("See the calendar for the full list.", ""),
            created_at: now,
        })
        .await?;

    println!("  ✅ Created 1 family with a message and a broadcast notification");

    println!("🎉 Seeding complete!");
    Ok(())
}
