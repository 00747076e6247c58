//! Board Search Operations
//!
//! Paged substring search over board name and description, newest first.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{Board, DomainResult};
use super::super::db::not_initialized;
use super::super::traits::SearchableRepository;
use super::board_repo::{row_to_board, BOARD_COLUMNS};

#[async_trait]
impl SearchableRepository<Board> for super::board_repo::BoardRepository {
    async fn search_paged(
        &self,
        query: Option<&str>,
        offset: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Board>, u32)> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let pattern = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let total: u32 = conn.query_row(
            "SELECT COUNT(*) FROM boards
             WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'",
            params![pattern],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM boards
             WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
             ORDER BY created_at DESC, id DESC
             LIMIT ?2 OFFSET ?3",
            BOARD_COLUMNS
        ))?;
        let boards = stmt
            .query_map(params![pattern, limit, offset], row_to_board)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((boards, total))
    }
}

/// Wrap a search term for LIKE, escaping its wildcards
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
