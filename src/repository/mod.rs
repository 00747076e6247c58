//! Repository Layer
//!
//! Data access abstractions and their SQLite implementations.

mod traits;
mod db;
mod ordering;
mod board;
mod list;
mod card;


pub use traits::{Repository, SearchableRepository};
pub use db::{init_db, DbState, SharedConnection};
pub use board::BoardRepository;
pub use list::{ListPositioningOperations, ListRepository};
pub use card::{CardPositioningOperations, CardRepository};
