//! List Entity
//!
//! An ordered column within a board. Lists own their cards.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A list (column) within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: u32,
    /// Owning board
    pub board_id: u32,
    pub name: String,
    /// 1-based rank among the board's lists
    pub position: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl BoardList {
    pub fn new(id: u32, board_id: u32, name: String, position: i32) -> Self {
        Self {
            id,
            board_id,
            name,
            position,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Entity for BoardList {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
