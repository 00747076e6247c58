//! List Positioning Operations
//!
//! Operations for managing list positions within a board.

use async_trait::async_trait;

use crate::domain::{BoardList, DomainError, DomainResult, ListWithCards, PositionAllocator};
use super::super::db::not_initialized;
use super::super::ordering::{row_exists, LIST_SIBLINGS};
use super::list_repo::{find_list, lists_by_board, lists_with_cards};

/// Trait for list positioning operations
#[async_trait]
pub trait ListPositioningOperations {
    /// Lists of a board in ascending position order
    async fn list_by_board(&self, board_id: u32) -> DomainResult<Vec<BoardList>>;

    /// Lists of a board with their cards, read as one snapshot
    async fn list_with_cards_by_board(&self, board_id: u32) -> DomainResult<Vec<ListWithCards>>;

    /// Move a list to a new position within its board
    async fn reposition(&self, id: u32, position: i32) -> DomainResult<BoardList>;

    /// Reindex lists of a board to be sequential (1, 2, 3, ...)
    async fn reindex_lists(&self, board_id: u32) -> DomainResult<()>;
}

#[async_trait]
impl ListPositioningOperations for super::list_repo::ListRepository {
    async fn list_by_board(&self, board_id: u32) -> DomainResult<Vec<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if !row_exists(conn, "boards", board_id)? {
            return Err(DomainError::board_not_found(board_id));
        }
        lists_by_board(conn, board_id)
    }

    async fn list_with_cards_by_board(&self, board_id: u32) -> DomainResult<Vec<ListWithCards>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if !row_exists(conn, "boards", board_id)? {
            return Err(DomainError::board_not_found(board_id));
        }
        lists_with_cards(conn, board_id)
    }

    async fn reposition(&self, id: u32, position: i32) -> DomainResult<BoardList> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let board_id = LIST_SIBLINGS
            .parent_of(&tx, id)?
            .ok_or_else(|| DomainError::list_not_found(id))?;
        let siblings = LIST_SIBLINGS.ordered_ids(&tx, board_id)?;
        let order = PositionAllocator::place(&siblings, id, position);
        LIST_SIBLINGS.apply_order(&tx, &order)?;

        let list = find_list(&tx, id)?.ok_or_else(|| DomainError::list_not_found(id))?;
        tx.commit()?;
        Ok(list)
    }

    async fn reindex_lists(&self, board_id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if !row_exists(&tx, "boards", board_id)? {
            return Err(DomainError::board_not_found(board_id));
        }
        LIST_SIBLINGS.reindex(&tx, board_id)?;

        tx.commit()?;
        Ok(())
    }
}
