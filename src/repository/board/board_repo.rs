//! Board Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Board CRUD operations.
//! Deleting a board cascades through its lists and their cards in one transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{now_millis, Board, BoardTree, DomainError, DomainResult};
use super::super::db::{last_insert_id, not_initialized, SharedConnection};
use super::super::list::lists_with_cards;
use super::super::traits::Repository;

pub(super) const BOARD_COLUMNS: &str = "id, name, description, activity_id, created_at, updated_at";

/// SQLite implementation of Board repository
pub struct BoardRepository {
    pub(crate) conn: SharedConnection,
}

impl BoardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Read, mutate and write back one board under a single lock
    pub async fn modify<F>(&self, id: u32, mutate: F) -> DomainResult<Board>
    where
        F: FnOnce(&mut Board) + Send,
    {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut board = find_board(&tx, id)?.ok_or_else(|| DomainError::board_not_found(id))?;
        mutate(&mut board);
        board.id = id;
        board.updated_at = now_millis();
        write_board_fields(&tx, &board)?;

        tx.commit()?;
        Ok(board)
    }

    /// Board with all lists and cards, read as one snapshot
    pub async fn load_tree(&self, id: u32) -> DomainResult<Option<BoardTree>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let Some(board) = find_board(conn, id)? else {
            return Ok(None);
        };
        let lists = lists_with_cards(conn, id)?;
        Ok(Some(BoardTree { board, lists }))
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let now = now_millis();
        tx.execute(
            "INSERT INTO boards (name, description, activity_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![entity.name, entity.description, entity.activity_id, now],
        )?;
        let id = last_insert_id(&tx)?;
        tx.commit()?;

        let mut board = entity.clone();
        board.id = id;
        board.created_at = now;
        board.updated_at = now;
        Ok(board)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_board(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Board>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM boards ORDER BY created_at DESC, id DESC",
            BOARD_COLUMNS
        ))?;
        let boards = stmt
            .query_map([], row_to_board)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut board = entity.clone();
        board.updated_at = now_millis();
        if write_board_fields(conn, &board)? == 0 {
            return Err(DomainError::board_not_found(entity.id));
        }
        find_board(conn, entity.id)?.ok_or_else(|| DomainError::board_not_found(entity.id))
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        if find_board(&tx, id)?.is_none() {
            return Err(DomainError::board_not_found(id));
        }

        // Bottom-up: cards of every list, then the lists, then the board
        let cards = tx.execute(
            "DELETE FROM cards WHERE list_id IN (SELECT id FROM lists WHERE board_id = ?)",
            params![id],
        )?;
        let lists = tx.execute("DELETE FROM lists WHERE board_id = ?", params![id])?;
        tx.execute("DELETE FROM boards WHERE id = ?", params![id])?;

        tx.commit()?;
        log::info!("board {} deleted ({} lists, {} cards)", id, lists, cards);
        Ok(())
    }
}

/// Find a board by id on an already-locked connection
pub(super) fn find_board(conn: &Connection, id: u32) -> DomainResult<Option<Board>> {
    let board = conn
        .query_row(
            &format!("SELECT {} FROM boards WHERE id = ?", BOARD_COLUMNS),
            params![id],
            row_to_board,
        )
        .optional()?;
    Ok(board)
}

fn write_board_fields(conn: &Connection, board: &Board) -> DomainResult<usize> {
    let changed = conn.execute(
        "UPDATE boards SET name = ?, description = ?, activity_id = ?, updated_at = ? WHERE id = ?",
        params![board.name, board.description, board.activity_id, board.updated_at, board.id],
    )?;
    Ok(changed)
}

/// Convert a database row to Board
pub(super) fn row_to_board(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        activity_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
