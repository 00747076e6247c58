//! Board Repository Module
//!
//! - board_repo: Core CRUD operations, cascade delete, hierarchy snapshot
//! - board_search: Paged search

mod board_repo;
mod board_search;

pub use board_repo::BoardRepository;
