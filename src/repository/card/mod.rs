//! Card Repository Module
//!
//! - card_repo: Core CRUD operations
//! - card_positioning: Position management (move, reposition, reindex)

mod card_repo;
mod card_positioning;

pub use card_repo::CardRepository;
pub use card_positioning::CardPositioningOperations;

pub(crate) use card_repo::cards_by_list;
