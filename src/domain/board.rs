//! Board Entity
//!
//! Top-level container for a logistics workflow, optionally tied to one
//! scheduled activity from the external catalog.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A logistics board holding ordered lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Unique identifier
    pub id: u32,
    /// Board name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// External scheduled-activity reference
    pub activity_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Board {
    pub fn new(id: u32, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            activity_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Entity for Board {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
