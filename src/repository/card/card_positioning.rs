//! Card Positioning Operations
//!
//! Operations for managing card positions within and across lists.
//! Every mutation runs in one transaction and leaves the touched lists dense (1..N).

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::domain::{now_millis, Card, DomainError, DomainResult, PositionAllocator};
use super::super::db::not_initialized;
use super::super::ordering::{row_exists, CARD_SIBLINGS, LIST_SIBLINGS};
use super::card_repo::{cards_by_list, find_card};

/// Trait for card positioning operations
#[async_trait]
pub trait CardPositioningOperations {
    /// Cards of a list in ascending position order
    async fn list_by_list(&self, list_id: u32) -> DomainResult<Vec<Card>>;

    /// Move a card to a list and position in one step
    async fn move_to(&self, id: u32, new_list_id: u32, position: i32) -> DomainResult<Card>;

    /// Like `move_to`, but both the current and target list must belong to `board_id`
    async fn move_within_board(
        &self,
        board_id: u32,
        id: u32,
        new_list_id: u32,
        position: i32,
    ) -> DomainResult<Card>;

    /// Reposition a card inside its current list
    async fn reposition(&self, id: u32, position: i32) -> DomainResult<Card>;

    /// Reindex cards of a list to be sequential (1, 2, 3, ...)
    async fn reindex_cards(&self, list_id: u32) -> DomainResult<()>;
}

#[async_trait]
impl CardPositioningOperations for super::card_repo::CardRepository {
    async fn list_by_list(&self, list_id: u32) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if !row_exists(conn, "lists", list_id)? {
            return Err(DomainError::list_not_found(list_id));
        }
        cards_by_list(conn, list_id)
    }

    async fn move_to(&self, id: u32, new_list_id: u32, position: i32) -> DomainResult<Card> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let card = relocate(&tx, id, new_list_id, position)?;

        tx.commit()?;
        Ok(card)
    }

    async fn move_within_board(
        &self,
        board_id: u32,
        id: u32,
        new_list_id: u32,
        position: i32,
    ) -> DomainResult<Card> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let current_list = CARD_SIBLINGS
            .parent_of(&tx, id)?
            .ok_or_else(|| DomainError::card_not_found(id))?;
        let target_board = LIST_SIBLINGS
            .parent_of(&tx, new_list_id)?
            .ok_or_else(|| DomainError::list_not_found(new_list_id))?;
        if !row_exists(&tx, "boards", board_id)? {
            return Err(DomainError::board_not_found(board_id));
        }
        let current_board = LIST_SIBLINGS.parent_of(&tx, current_list)?;
        if current_board != Some(board_id) || target_board != board_id {
            return Err(DomainError::CrossBoardMove { card_id: id, board_id });
        }

        let card = relocate(&tx, id, new_list_id, position)?;

        tx.commit()?;
        Ok(card)
    }

    async fn reposition(&self, id: u32, position: i32) -> DomainResult<Card> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let list_id = CARD_SIBLINGS
            .parent_of(&tx, id)?
            .ok_or_else(|| DomainError::card_not_found(id))?;
        let card = relocate(&tx, id, list_id, position)?;

        tx.commit()?;
        Ok(card)
    }

    async fn reindex_cards(&self, list_id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if !row_exists(&tx, "lists", list_id)? {
            return Err(DomainError::list_not_found(list_id));
        }
        CARD_SIBLINGS.reindex(&tx, list_id)?;

        tx.commit()?;
        Ok(())
    }
}

/// Move a card to `new_list_id` at `position`, keeping source and target lists dense.
///
/// The caller owns the transaction; nothing is written when a lookup fails.
fn relocate(conn: &Connection, id: u32, new_list_id: u32, position: i32) -> DomainResult<Card> {
    let old_list_id = CARD_SIBLINGS
        .parent_of(conn, id)?
        .ok_or_else(|| DomainError::card_not_found(id))?;
    if !row_exists(conn, "lists", new_list_id)? {
        return Err(DomainError::list_not_found(new_list_id));
    }

    if old_list_id != new_list_id {
        conn.execute(
            "UPDATE cards SET list_id = ?, updated_at = ? WHERE id = ?",
            params![new_list_id, now_millis(), id],
        )?;
        CARD_SIBLINGS.reindex(conn, old_list_id)?;
    }

    let siblings = CARD_SIBLINGS.ordered_ids(conn, new_list_id)?;
    let order = PositionAllocator::place(&siblings, id, position);
    CARD_SIBLINGS.apply_order(conn, &order)?;

    log::debug!(
        "card {} moved from list {} to list {} at position {}",
        id,
        old_list_id,
        new_list_id,
        position
    );

    find_card(conn, id)?.ok_or_else(|| DomainError::card_not_found(id))
}
