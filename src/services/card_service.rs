//! Card Ordering Service
//!
//! Manages cards within lists: creation at a position, content and metadata
//! updates, moves between lists, and deletion. Positions stay dense after
//! every operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    normalize_labels, require_non_empty, require_non_negative_position, Card, CardDates,
    CardDetails, CardStatus, DomainError, DomainResult,
};
use crate::repository::{CardPositioningOperations, CardRepository, Repository, SharedConnection};
use super::collaborators::{ActivityCatalog, MemberDirectory};

pub struct CardOrderingService {
    cards: CardRepository,
    members: Arc<dyn MemberDirectory>,
    activities: Arc<dyn ActivityCatalog>,
}

impl CardOrderingService {
    pub fn new(
        conn: SharedConnection,
        members: Arc<dyn MemberDirectory>,
        activities: Arc<dyn ActivityCatalog>,
    ) -> Self {
        Self {
            cards: CardRepository::new(conn),
            members,
            activities,
        }
    }

    /// Create a card. `None` appends after the last card; `Some(p)` inserts at p
    /// (clamped) and shifts later cards down.
    pub async fn create_card(
        &self,
        title: &str,
        list_id: u32,
        position: Option<i32>,
        description: &str,
    ) -> DomainResult<Card> {
        let title = require_non_empty("title", title)?;
        let card = Card::new(0, list_id, title, description.to_string(), 0);

        let created = match position {
            Some(position) => {
                let mut card = card;
                card.position = require_non_negative_position(position)?;
                self.cards.create(&card).await?
            }
            None => self.cards.append(&card).await?,
        };

        log::info!(
            "created card {} in list {} at position {}",
            created.id,
            list_id,
            created.position
        );
        Ok(created)
    }

    pub async fn update_content(
        &self,
        card_id: u32,
        title: &str,
        description: &str,
    ) -> DomainResult<Card> {
        let title = require_non_empty("title", title)?;
        let description = description.to_string();
        self.cards
            .modify(card_id, move |card| {
                card.title = title;
                card.description = description;
            })
            .await
    }

    /// Move a card to another list (or the same one) at `new_position`.
    ///
    /// Board membership of the target list is not checked here; see
    /// `move_card_within_board`.
    pub async fn move_card(
        &self,
        card_id: u32,
        new_list_id: u32,
        new_position: i32,
    ) -> DomainResult<Card> {
        let new_position = require_non_negative_position(new_position)?;
        let card = self.cards.move_to(card_id, new_list_id, new_position).await?;
        log::info!(
            "moved card {} to list {} position {}",
            card_id,
            new_list_id,
            card.position
        );
        Ok(card)
    }

    /// Move a card, refusing targets outside `board_id` with `CrossBoardMove`
    pub async fn move_card_within_board(
        &self,
        board_id: u32,
        card_id: u32,
        new_list_id: u32,
        new_position: i32,
    ) -> DomainResult<Card> {
        let new_position = require_non_negative_position(new_position)?;
        let result = self
            .cards
            .move_within_board(board_id, card_id, new_list_id, new_position)
            .await;
        if let Err(DomainError::CrossBoardMove { .. }) = &result {
            log::warn!(
                "rejected move of card {} to list {} outside board {}",
                card_id,
                new_list_id,
                board_id
            );
        }
        result
    }

    /// Reposition within the card's current list
    pub async fn update_position(&self, card_id: u32, position: i32) -> DomainResult<Card> {
        let position = require_non_negative_position(position)?;
        self.cards.reposition(card_id, position).await
    }

    /// Set or clear (`None`) the card's scheduled activity
    pub async fn associate_with_activity(
        &self,
        card_id: u32,
        activity_id: Option<&str>,
    ) -> DomainResult<Card> {
        if let Some(id) = activity_id {
            if self.activities.find_activity(id).await?.is_none() {
                return Err(DomainError::NotFound(format!("Activity {} not found", id)));
            }
        }
        let activity_id = activity_id.map(str::to_string);
        self.cards
            .modify(card_id, move |card| card.activity_id = activity_id)
            .await
    }

    /// Set or clear (`None`) the card's assignee
    pub async fn assign_to_member(
        &self,
        card_id: u32,
        member_id: Option<&str>,
    ) -> DomainResult<Card> {
        if let Some(id) = member_id {
            if self.members.find_member(id).await?.is_none() {
                return Err(DomainError::NotFound(format!("Member {} not found", id)));
            }
        }
        let member_id = member_id.map(str::to_string);
        self.cards
            .modify(card_id, move |card| card.member_id = member_id)
            .await
    }

    /// Any status may follow any other
    pub async fn set_status(&self, card_id: u32, status: CardStatus) -> DomainResult<Card> {
        self.cards.modify(card_id, move |card| card.status = status).await
    }

    pub async fn set_labels(
        &self,
        card_id: u32,
        labels: Option<Vec<String>>,
    ) -> DomainResult<Card> {
        let labels = normalize_labels(labels);
        self.cards.modify(card_id, move |card| card.labels = labels).await
    }

    pub async fn set_dates(
        &self,
        card_id: u32,
        start_at: Option<DateTime<Utc>>,
        due_at: Option<DateTime<Utc>>,
        reminder_at: Option<DateTime<Utc>>,
    ) -> DomainResult<Card> {
        let dates = CardDates {
            start_at,
            due_at,
            reminder_at,
        };
        self.cards.modify(card_id, move |card| card.dates = dates).await
    }

    pub async fn set_checklist(
        &self,
        card_id: u32,
        checklist: Option<serde_json::Value>,
    ) -> DomainResult<Card> {
        self.cards
            .modify(card_id, move |card| card.checklist = checklist)
            .await
    }

    pub async fn set_attachments(
        &self,
        card_id: u32,
        attachments: Option<serde_json::Value>,
    ) -> DomainResult<Card> {
        self.cards
            .modify(card_id, move |card| card.attachments = attachments)
            .await
    }

    /// Delete a card and close the gap it leaves in its list
    pub async fn delete_card(&self, card_id: u32) -> DomainResult<()> {
        self.cards.delete(card_id).await?;
        log::info!("deleted card {}", card_id);
        Ok(())
    }

    /// Cards of a list, ascending by position. Each call is a fresh query.
    pub async fn list_cards_by_list(&self, list_id: u32) -> DomainResult<Vec<Card>> {
        self.cards.list_by_list(list_id).await
    }

    pub async fn get_card(&self, card_id: u32) -> DomainResult<Option<Card>> {
        self.cards.find_by_id(card_id).await
    }

    /// Card with its assignee and activity resolved.
    ///
    /// References the collaborators no longer know resolve to `None`.
    pub async fn card_details(&self, card_id: u32) -> DomainResult<CardDetails> {
        let card = self
            .cards
            .find_by_id(card_id)
            .await?
            .ok_or_else(|| DomainError::card_not_found(card_id))?;

        let assignee = match &card.member_id {
            Some(id) => self.members.find_member(id).await?,
            None => None,
        };
        let activity = match &card.activity_id {
            Some(id) => self.activities.find_activity(id).await?,
            None => None,
        };

        Ok(CardDetails {
            card,
            assignee,
            activity,
        })
    }

    /// Renumber a list's cards to 1..N, keeping their relative order
    pub async fn normalize_positions(&self, list_id: u32) -> DomainResult<()> {
        self.cards.reindex_cards(list_id).await
    }
}
