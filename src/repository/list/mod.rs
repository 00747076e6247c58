//! List Repository Module
//!
//! - list_repo: Core CRUD operations (delete cascades to cards)
//! - list_positioning: Position management and board-scoped reads

mod list_repo;
mod list_positioning;

pub use list_repo::ListRepository;
pub use list_positioning::ListPositioningOperations;

pub(crate) use list_repo::lists_with_cards;
