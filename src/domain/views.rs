//! Read Projections
//!
//! Composite shapes returned by hierarchy reads. Never persisted.

use serde::{Deserialize, Serialize};

use super::{Activity, Board, BoardList, Card, Member};

/// A list with its cards in position order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithCards {
    pub list: BoardList,
    pub cards: Vec<Card>,
}

/// A board with every list and card, all in position order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardTree {
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}

impl BoardTree {
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}

/// One page of boards plus the unpaged match count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPage {
    pub boards: Vec<Board>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
}

/// A card enriched with its resolved external references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub card: Card,
    pub assignee: Option<Member>,
    pub activity: Option<Activity>,
}
