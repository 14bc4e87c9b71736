use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod archive_repository;
pub mod event_repository;
pub mod family_repository;
pub mod message_repository;
pub mod news_repository;
pub mod staff_repository;

pub use archive_repository::SqliteArchiveRepository;
pub use event_repository::SqliteEventRepository;
pub use family_repository::{SqliteChildRepository, SqliteParentRepository};
pub use message_repository::{SqliteMessageRepository, SqliteNotificationRepository};
pub use news_repository::SqliteNewsRepository;
pub use staff_repository::SqliteStaffRepository;

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, post: NewsPost) -> Result<NewsPost>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NewsPost>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<NewsPost>>;
    async fn list(&self) -> Result<Vec<NewsPost>>;
    async fn list_published(&self) -> Result<Vec<NewsPost>>;
    async fn update(&self, id: Uuid, post: NewsPost) -> Result<NewsPost>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: CalendarEvent) -> Result<CalendarEvent>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>>;
    async fn list(&self) -> Result<Vec<CalendarEvent>>;
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<CalendarEvent>>;
    /// Lenient listing for the calendar feed: rows that fail to decode are
    /// skipped with a logged diagnostic instead of failing the whole fetch.
    async fn list_for_feed(&self) -> Result<Vec<CalendarEvent>>;
    async fn update(&self, id: Uuid, event: CalendarEvent) -> Result<CalendarEvent>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    async fn create(&self, item: ArchivedItem) -> Result<ArchivedItem>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArchivedItem>>;
    async fn list(&self) -> Result<Vec<ArchivedItem>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create(&self, member: StaffMember) -> Result<StaffMember>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffMember>>;
    async fn list(&self) -> Result<Vec<StaffMember>>;
    async fn update(&self, id: Uuid, member: StaffMember) -> Result<StaffMember>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ParentRepository: Send + Sync {
    async fn create(&self, parent: Parent) -> Result<Parent>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Parent>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Parent>>;
    async fn list(&self) -> Result<Vec<Parent>>;
    async fn update(&self, id: Uuid, parent: Parent) -> Result<Parent>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ChildRepository: Send + Sync {
    async fn create(&self, child: Child) -> Result<Child>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Child>>;
    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<Child>>;
    async fn update(&self, id: Uuid, child: Child) -> Result<Child>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: InboxMessage) -> Result<InboxMessage>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InboxMessage>>;
    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<InboxMessage>>;
    async fn mark_read(&self, id: Uuid) -> Result<InboxMessage>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification>;
    /// Notifications visible to one parent: their own plus broadcasts.
    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<Notification>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}
