//! Board Lifecycle Service
//!
//! Board creation, details, activity association, cascading delete,
//! full-hierarchy reads and paged search.

use std::sync::Arc;

use crate::domain::{require_non_empty, Board, BoardPage, BoardTree, DomainError, DomainResult};
use crate::repository::{BoardRepository, Repository, SearchableRepository, SharedConnection};
use super::collaborators::ActivityCatalog;

/// Page size bounds applied to `list_boards_paged`
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

pub struct BoardLifecycleService {
    boards: BoardRepository,
    activities: Arc<dyn ActivityCatalog>,
    limits: PageLimits,
}

impl BoardLifecycleService {
    pub fn new(
        conn: SharedConnection,
        activities: Arc<dyn ActivityCatalog>,
        limits: PageLimits,
    ) -> Self {
        Self {
            boards: BoardRepository::new(conn),
            activities,
            limits,
        }
    }

    pub async fn create_board(&self, name: &str, description: &str) -> DomainResult<Board> {
        let name = require_non_empty("name", name)?;
        let board = self
            .boards
            .create(&Board::new(0, name, description.to_string()))
            .await?;
        log::info!("created board {} ({})", board.id, board.name);
        Ok(board)
    }

    pub async fn update_details(
        &self,
        board_id: u32,
        name: &str,
        description: &str,
    ) -> DomainResult<Board> {
        let name = require_non_empty("name", name)?;
        let description = description.to_string();
        self.boards
            .modify(board_id, move |board| {
                board.name = name;
                board.description = description;
            })
            .await
    }

    /// Set or clear (`None`) the board's scheduled activity
    pub async fn associate_with_activity(
        &self,
        board_id: u32,
        activity_id: Option<&str>,
    ) -> DomainResult<Board> {
        if let Some(id) = activity_id {
            if self.activities.find_activity(id).await?.is_none() {
                return Err(DomainError::NotFound(format!("Activity {} not found", id)));
            }
        }
        let activity_id = activity_id.map(str::to_string);
        self.boards
            .modify(board_id, move |board| board.activity_id = activity_id)
            .await
    }

    /// Delete the board with every list and card it owns, all or nothing
    pub async fn delete_board(&self, board_id: u32) -> DomainResult<()> {
        self.boards.delete(board_id).await
    }

    /// Board, lists and cards in position order; `None` if the board does not exist
    pub async fn get_board_with_lists_and_cards(
        &self,
        board_id: u32,
    ) -> DomainResult<Option<BoardTree>> {
        self.boards.load_tree(board_id).await
    }

    pub async fn get_board(&self, board_id: u32) -> DomainResult<Option<Board>> {
        self.boards.find_by_id(board_id).await
    }

    /// One page of boards, newest first.
    ///
    /// `page` is 1-based (0 reads as 1). `page_size` falls back to the configured
    /// default and is capped at the configured maximum; an explicit 0 is rejected.
    pub async fn list_boards_paged(
        &self,
        page: u32,
        page_size: Option<u32>,
        search: Option<&str>,
    ) -> DomainResult<BoardPage> {
        let page_size = match page_size {
            Some(0) => {
                return Err(DomainError::InvalidInput("page_size must be positive".to_string()))
            }
            Some(size) => size.min(self.limits.max_page_size),
            None => self.limits.default_page_size,
        };
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(page_size);

        let (boards, total) = self.boards.search_paged(search, offset, page_size).await?;
        Ok(BoardPage {
            boards,
            total,
            page,
            page_size,
        })
    }
}
