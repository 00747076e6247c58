//! List Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for List CRUD operations.
//! Deleting a list removes its cards first, then closes the gap among the board's lists.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    now_millis, BoardList, DomainError, DomainResult, ListWithCards, PositionAllocator,
};
use super::super::card::cards_by_list;
use super::super::db::{last_insert_id, not_initialized, SharedConnection};
use super::super::ordering::{row_exists, LIST_SIBLINGS};
use super::super::traits::Repository;

const LIST_COLUMNS: &str = "id, board_id, name, position, created_at, updated_at";

/// SQLite implementation of List repository
pub struct ListRepository {
    pub(crate) conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Rename a list under one lock
    pub async fn rename(&self, id: u32, name: &str) -> DomainResult<BoardList> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE lists SET name = ?, updated_at = ? WHERE id = ?",
            params![name, now_millis(), id],
        )?;
        if changed == 0 {
            return Err(DomainError::list_not_found(id));
        }
        find_list(conn, id)?.ok_or_else(|| DomainError::list_not_found(id))
    }

    /// Insert a list after the last list of its board, ignoring `entity.position`
    pub async fn append(&self, entity: &BoardList) -> DomainResult<BoardList> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let list = insert_list(&tx, entity, None)?;

        tx.commit()?;
        Ok(list)
    }
}

#[async_trait]
impl Repository<BoardList> for ListRepository {
    async fn create(&self, entity: &BoardList) -> DomainResult<BoardList> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let list = insert_list(&tx, entity, Some(entity.position))?;

        tx.commit()?;
        Ok(list)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_list(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<BoardList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lists ORDER BY board_id, position, id",
            LIST_COLUMNS
        ))?;
        let lists = stmt
            .query_map([], row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn update(&self, entity: &BoardList) -> DomainResult<BoardList> {
        self.rename(entity.id, &entity.name).await
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let board_id = LIST_SIBLINGS
            .parent_of(&tx, id)?
            .ok_or_else(|| DomainError::list_not_found(id))?;

        // Cards first, then the list itself
        let cards = tx.execute("DELETE FROM cards WHERE list_id = ?", params![id])?;
        tx.execute("DELETE FROM lists WHERE id = ?", params![id])?;
        LIST_SIBLINGS.reindex(&tx, board_id)?;

        tx.commit()?;
        log::debug!("list {} deleted with {} cards", id, cards);
        Ok(())
    }
}

/// Insert a list at `position` (or append when `None`) and renumber its board
fn insert_list(
    conn: &Connection,
    entity: &BoardList,
    position: Option<i32>,
) -> DomainResult<BoardList> {
    if !row_exists(conn, "boards", entity.board_id)? {
        return Err(DomainError::board_not_found(entity.board_id));
    }
    let siblings = LIST_SIBLINGS.ordered_ids(conn, entity.board_id)?;
    let requested = match position {
        Some(position) => position,
        None => LIST_SIBLINGS.next_position(conn, entity.board_id)?,
    };

    let now = now_millis();
    conn.execute(
        "INSERT INTO lists (board_id, name, position, created_at, updated_at) VALUES (?1, ?2, 0, ?3, ?3)",
        params![entity.board_id, entity.name, now],
    )?;
    let id = last_insert_id(conn)?;

    let order = PositionAllocator::place(&siblings, id, requested);
    LIST_SIBLINGS.apply_order(conn, &order)?;

    find_list(conn, id)?
        .ok_or_else(|| DomainError::Internal(format!("List {} vanished after insert", id)))
}

/// Find a list by id on an already-locked connection
pub(crate) fn find_list(conn: &Connection, id: u32) -> DomainResult<Option<BoardList>> {
    let list = conn
        .query_row(
            &format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS),
            params![id],
            row_to_list,
        )
        .optional()?;
    Ok(list)
}

/// Lists of one board in position order
pub(crate) fn lists_by_board(conn: &Connection, board_id: u32) -> DomainResult<Vec<BoardList>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM lists WHERE board_id = ? ORDER BY position, id",
        LIST_COLUMNS
    ))?;
    let lists = stmt
        .query_map(params![board_id], row_to_list)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

/// Lists of one board, each with its cards, all in position order
pub(crate) fn lists_with_cards(
    conn: &Connection,
    board_id: u32,
) -> DomainResult<Vec<ListWithCards>> {
    lists_by_board(conn, board_id)?
        .into_iter()
        .map(|list| -> DomainResult<ListWithCards> {
            let cards = cards_by_list(conn, list.id)?;
            Ok(ListWithCards { list, cards })
        })
        .collect()
}

/// Convert a database row to BoardList
fn row_to_list(row: &Row) -> rusqlite::Result<BoardList> {
    Ok(BoardList {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
