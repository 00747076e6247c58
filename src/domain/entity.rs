//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all board entities.
//! All entities must have a unique ID and be thread-safe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A board-scoped move targeted a list outside that board
    #[error("Cross-board move: card {card_id} cannot leave board {board_id}")]
    CrossBoardMove { card_id: u32, board_id: u32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn board_not_found(id: u32) -> Self {
        DomainError::NotFound(format!("Board {} not found", id))
    }

    pub fn list_not_found(id: u32) -> Self {
        DomainError::NotFound(format!("List {} not found", id))
    }

    pub fn card_not_found(id: u32) -> Self {
        DomainError::NotFound(format!("Card {} not found", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::Conflict(msg.unwrap_or_else(|| err.to_string()))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// Reject blank names/titles before anything is written
pub fn require_non_empty(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Positions are 1-based; zero is accepted and clamps to the front
pub fn require_non_negative_position(position: i32) -> DomainResult<i32> {
    if position < 0 {
        return Err(DomainError::InvalidInput(format!(
            "position must not be negative (got {})",
            position
        )));
    }
    Ok(position)
}

/// Current time in epoch milliseconds, used for audit columns
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
