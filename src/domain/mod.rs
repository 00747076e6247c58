//! Domain Layer
//!
//! Board, list and card entities plus the pure position math that keeps
//! sibling ordering dense.

mod entity;
mod board;
mod list;
mod card;
mod position;
mod views;
mod external;

pub use entity::{
    now_millis, require_non_empty, require_non_negative_position, DomainError, DomainResult,
    Entity,
};
pub use board::Board;
pub use list::BoardList;
pub use card::{normalize_labels, Card, CardDates, CardStatus};
pub use position::PositionAllocator;
pub use views::{BoardPage, BoardTree, CardDetails, ListWithCards};
pub use external::{Activity, Member};
