//! Sibling Ordering Helpers
//!
//! Synchronous SQL helpers shared by the list and card repositories. Callers
//! hold the connection lock and usually an open transaction.

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{now_millis, DomainResult, PositionAllocator};

/// A table whose rows are ordered under a parent column
#[derive(Debug, Clone, Copy)]
pub(crate) struct Siblings {
    pub table: &'static str,
    pub parent_column: &'static str,
}

pub(crate) const LIST_SIBLINGS: Siblings = Siblings {
    table: "lists",
    parent_column: "board_id",
};

pub(crate) const CARD_SIBLINGS: Siblings = Siblings {
    table: "cards",
    parent_column: "list_id",
};

impl Siblings {
    /// Ids under a parent in current order (position, then id for ties)
    pub fn ordered_ids(&self, conn: &Connection, parent_id: u32) -> DomainResult<Vec<u32>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM {} WHERE {} = ? ORDER BY position, id",
            self.table, self.parent_column
        ))?;
        let ids = stmt
            .query_map(params![parent_id], |row| row.get::<_, u32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Current positions under a parent
    pub fn positions(&self, conn: &Connection, parent_id: u32) -> DomainResult<Vec<i32>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT position FROM {} WHERE {} = ?",
            self.table, self.parent_column
        ))?;
        let positions = stmt
            .query_map(params![parent_id], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions)
    }

    /// Append position under a parent
    pub fn next_position(&self, conn: &Connection, parent_id: u32) -> DomainResult<i32> {
        Ok(PositionAllocator::next_position(&self.positions(conn, parent_id)?))
    }

    /// Rewrite positions to 1..N following `ordered_ids`. Untouched rows keep their timestamp.
    pub fn apply_order(&self, conn: &Connection, ordered_ids: &[u32]) -> DomainResult<()> {
        let now = now_millis();
        let mut stmt = conn.prepare(&format!(
            "UPDATE {} SET position = ?1, updated_at = ?2 WHERE id = ?3 AND position != ?1",
            self.table
        ))?;
        for (id, position) in PositionAllocator::reindex(ordered_ids) {
            stmt.execute(params![position, now, id])?;
        }
        Ok(())
    }

    /// Close gaps and duplicates under a parent, keeping relative order
    pub fn reindex(&self, conn: &Connection, parent_id: u32) -> DomainResult<()> {
        let ids = self.ordered_ids(conn, parent_id)?;
        self.apply_order(conn, &ids)
    }

    /// Parent of a row, or `None` if the row does not exist
    pub fn parent_of(&self, conn: &Connection, id: u32) -> DomainResult<Option<u32>> {
        let parent = conn
            .query_row(
                &format!("SELECT {} FROM {} WHERE id = ?", self.parent_column, self.table),
                params![id],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(parent)
    }
}

/// True if a row with this id exists in `table`
pub(crate) fn row_exists(conn: &Connection, table: &str, id: u32) -> DomainResult<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?", table),
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
