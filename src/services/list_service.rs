//! List Ordering Service
//!
//! Manages lists within a board. Deleting a list removes its cards in the
//! same transaction.

use crate::domain::{
    require_non_empty, require_non_negative_position, BoardList, DomainResult, ListWithCards,
};
use crate::repository::{ListPositioningOperations, ListRepository, Repository, SharedConnection};

pub struct ListOrderingService {
    lists: ListRepository,
}

impl ListOrderingService {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            lists: ListRepository::new(conn),
        }
    }

    /// Create a list. `None` appends; `Some(p)` inserts at p (clamped).
    pub async fn create_list(
        &self,
        name: &str,
        board_id: u32,
        position: Option<i32>,
    ) -> DomainResult<BoardList> {
        let name = require_non_empty("name", name)?;
        let list = BoardList::new(0, board_id, name, 0);

        let created = match position {
            Some(position) => {
                let mut list = list;
                list.position = require_non_negative_position(position)?;
                self.lists.create(&list).await?
            }
            None => self.lists.append(&list).await?,
        };

        log::info!(
            "created list {} on board {} at position {}",
            created.id,
            board_id,
            created.position
        );
        Ok(created)
    }

    pub async fn update_name(&self, list_id: u32, name: &str) -> DomainResult<BoardList> {
        let name = require_non_empty("name", name)?;
        self.lists.rename(list_id, &name).await
    }

    pub async fn update_position(&self, list_id: u32, position: i32) -> DomainResult<BoardList> {
        let position = require_non_negative_position(position)?;
        self.lists.reposition(list_id, position).await
    }

    /// Delete a list together with its cards
    pub async fn delete_list(&self, list_id: u32) -> DomainResult<()> {
        self.lists.delete(list_id).await?;
        log::info!("deleted list {}", list_id);
        Ok(())
    }

    pub async fn list_lists_by_board(&self, board_id: u32) -> DomainResult<Vec<BoardList>> {
        self.lists.list_by_board(board_id).await
    }

    pub async fn list_lists_with_cards_by_board(
        &self,
        board_id: u32,
    ) -> DomainResult<Vec<ListWithCards>> {
        self.lists.list_with_cards_by_board(board_id).await
    }

    pub async fn get_list(&self, list_id: u32) -> DomainResult<Option<BoardList>> {
        self.lists.find_by_id(list_id).await
    }

    /// Renumber a board's lists to 1..N, keeping their relative order
    pub async fn normalize_positions(&self, board_id: u32) -> DomainResult<()> {
        self.lists.reindex_lists(board_id).await
    }
}
