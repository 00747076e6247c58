//! Card Entity
//!
//! A unit of work within a list. Carries a status tag, an optional assignee,
//! optional schedule fields and two opaque JSON sub-documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Card status. A label only: any status can follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Todo => "todo",
            CardStatus::InProgress => "in_progress",
            CardStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in_progress" => CardStatus::InProgress,
            "done" => CardStatus::Done,
            _ => CardStatus::Todo,
        }
    }
}

/// Optional schedule attached to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardDates {
    pub start_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub reminder_at: Option<DateTime<Utc>>,
}

/// A card within a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    /// Owning list
    pub list_id: u32,
    pub title: String,
    pub description: String,
    /// 1-based rank among the list's cards
    pub position: i32,
    /// External scheduled-activity reference
    pub activity_id: Option<String>,
    /// External member reference (assignee)
    pub member_id: Option<String>,
    pub status: CardStatus,
    pub labels: Option<Vec<String>>,
    pub dates: CardDates,
    /// Checklist items, stored as an opaque sub-document
    pub checklist: Option<serde_json::Value>,
    /// Attachment descriptors, stored as an opaque sub-document
    pub attachments: Option<serde_json::Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Card {
    pub fn new(id: u32, list_id: u32, title: String, description: String, position: i32) -> Self {
        Self {
            id,
            list_id,
            title,
            description,
            position,
            activity_id: None,
            member_id: None,
            status: CardStatus::Todo,
            labels: None,
            dates: CardDates::default(),
            checklist: None,
            attachments: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Entity for Card {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Trim labels, drop blanks and duplicates (first occurrence wins).
///
/// An empty result collapses to `None`.
pub fn normalize_labels(labels: Option<Vec<String>>) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for label in labels? {
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
