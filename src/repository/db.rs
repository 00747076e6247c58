//! Database Connection and Setup
//!
//! Manages the SQLite connection shared by every repository, and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle. One lock guards every read and write.
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    /// Get the shared connection handle, failing if the database is not open yet
    pub async fn get_connection(&self) -> DomainResult<SharedConnection> {
        if self.conn.lock().await.is_none() {
            return Err(not_initialized());
        }
        Ok(self.conn.clone())
    }

    /// Close the underlying connection. Repositories fail afterwards.
    pub async fn close(&self) {
        self.conn.lock().await.take();
    }
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

/// Id of the row just inserted on this connection
pub(crate) fn last_insert_id(conn: &Connection) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid)
        .map_err(|_| DomainError::Internal(format!("Row id {} is out of the id range", rowid)))
}

/// Initialize database with path (`:memory:` for an in-memory store)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Internal(format!("Failed to create db dir: {}", e)))?;
            }
        }
        Connection::open(db_path)?
    };

    run_migrations(&conn)?;
    log::info!("database ready at {}", db_path.display());

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            activity_id TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL REFERENCES boards(id),
            name TEXT NOT NULL,
            position INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES lists(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            position INTEGER NOT NULL,
            activity_id TEXT,
            member_id TEXT,
            status TEXT NOT NULL DEFAULT 'todo',
            labels TEXT,
            start_at INTEGER,
            due_at INTEGER,
            checklist TEXT,
            attachments TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_lists_board ON lists(board_id, position);
        CREATE INDEX IF NOT EXISTS idx_cards_list ON cards(list_id, position);",
    )?;

    // Reminders arrived after the first schedule columns
    if !column_exists(conn, "cards", "reminder_at")? {
        conn.execute("ALTER TABLE cards ADD COLUMN reminder_at INTEGER", ())?;
    }

    Ok(())
}
