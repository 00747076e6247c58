//! Logistics Board Core
//!
//! Board → List → Card hierarchy with dense ordering, cross-list moves and
//! transactional cascading deletes.
//!
//! Layered architecture:
//! - domain: Core entities, position math and errors
//! - repository: Data access abstractions and SQLite implementations
//! - services: Operations exposed to callers

use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod repository;
pub mod services;

pub use config::BoardConfig;
pub use domain::{
    Activity, Board, BoardList, BoardPage, BoardTree, Card, CardDates, CardDetails, CardStatus,
    DomainError, DomainResult, ListWithCards, Member, PositionAllocator,
};
pub use services::{
    ActivityCatalog, BoardLifecycleService, CardOrderingService, ListOrderingService,
    MemberDirectory, PageLimits,
};

use repository::{init_db, DbState};

/// Application state: the open database and the services built on it
pub struct AppState {
    pub config: BoardConfig,
    pub db_state: DbState,
    pub boards: BoardLifecycleService,
    pub lists: ListOrderingService,
    pub cards: CardOrderingService,
}

impl AppState {
    /// Initialize logging (when `log_dir` is set), open the database and build the services
    pub async fn open(
        config: BoardConfig,
        members: Arc<dyn MemberDirectory>,
        activities: Arc<dyn ActivityCatalog>,
    ) -> DomainResult<Self> {
        config.validate()?;

        if let Some(log_dir) = &config.log_dir {
            if let Err(e) = rolling_logger::init_logger(log_dir.clone(), &config.app_name) {
                // A second AppState in the same process finds the logger already installed
                log::warn!("file logging not enabled: {}", e);
            }
        }

        let db_state = init_db(&config.db_path).await?;
        let conn = db_state.get_connection().await?;
        let limits = PageLimits {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        };

        Ok(Self {
            boards: BoardLifecycleService::new(conn.clone(), activities.clone(), limits),
            lists: ListOrderingService::new(conn.clone()),
            cards: CardOrderingService::new(conn, members, activities),
            config,
            db_state,
        })
    }

    /// In-memory store with empty collaborators
    pub async fn in_memory() -> DomainResult<Self> {
        Self::open(
            BoardConfig::default(),
            Arc::new(services::InMemoryMemberDirectory::new()),
            Arc::new(services::InMemoryActivityCatalog::new()),
        )
        .await
    }
}
