//! Services Layer
//!
//! Operations exposed to callers. Validation happens here; ordering,
//! cascades and atomicity are delegated to the repositories.

mod board_service;
mod list_service;
mod card_service;
mod collaborators;

#[cfg(test)]
mod tests;

pub use board_service::{BoardLifecycleService, PageLimits};
pub use list_service::ListOrderingService;
pub use card_service::CardOrderingService;
pub use collaborators::{
    ActivityCatalog, InMemoryActivityCatalog, InMemoryMemberDirectory, MemberDirectory,
};
