pub mod homepage_service;
pub mod lifecycle_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ContentConfig;
use crate::repository::*;
pub use homepage_service::HomepageService;
pub use lifecycle_service::LifecycleService;

pub struct ServiceContext {
    pub news_repo: Arc<dyn NewsRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub archive_repo: Arc<dyn ArchiveRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
    pub parent_repo: Arc<dyn ParentRepository>,
    pub child_repo: Arc<dyn ChildRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub lifecycle_service: Arc<LifecycleService>,
    pub homepage_service: Arc<HomepageService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, content_config: ContentConfig) -> Self {
        let news_repo: Arc<dyn NewsRepository> =
            Arc::new(SqliteNewsRepository::new(db_pool.clone()));
        let event_repo: Arc<dyn EventRepository> =
            Arc::new(SqliteEventRepository::new(db_pool.clone()));
        let archive_repo: Arc<dyn ArchiveRepository> =
            Arc::new(SqliteArchiveRepository::new(db_pool.clone()));

        let lifecycle_service = Arc::new(LifecycleService::new(
            news_repo.clone(),
            event_repo.clone(),
            archive_repo.clone(),
            content_config.clone(),
        ));
        let homepage_service = Arc::new(HomepageService::new(
            news_repo.clone(),
            event_repo.clone(),
            content_config,
        ));

        Self {
            news_repo,
            event_repo,
            archive_repo,
            staff_repo: Arc::new(SqliteStaffRepository::new(db_pool.clone())),
            parent_repo: Arc::new(SqliteParentRepository::new(db_pool.clone())),
            child_repo: Arc::new(SqliteChildRepository::new(db_pool.clone())),
            message_repo: Arc::new(SqliteMessageRepository::new(db_pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepository::new(db_pool.clone())),
            lifecycle_service,
            homepage_service,
            db_pool,
        }
    }
}
