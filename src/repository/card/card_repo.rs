//! Card Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Card CRUD operations.
//! Position changes (move, reposition, reindex) live in card_positioning.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{
    now_millis, Card, CardDates, CardStatus, DomainError, DomainResult, PositionAllocator,
};
use super::super::db::{last_insert_id, not_initialized, SharedConnection};
use super::super::ordering::{row_exists, CARD_SIBLINGS};
use super::super::traits::Repository;

pub(crate) const CARD_COLUMNS: &str = "id, list_id, title, description, position, activity_id, member_id, status, labels, start_at, due_at, reminder_at, checklist, attachments, created_at, updated_at";

/// SQLite implementation of Card repository
pub struct CardRepository {
    pub(crate) conn: SharedConnection,
}

impl CardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Read, mutate and write back one card under a single lock and transaction.
    ///
    /// Only content and metadata are persisted; list and position changes are ignored.
    pub async fn modify<F>(&self, id: u32, mutate: F) -> DomainResult<Card>
    where
        F: FnOnce(&mut Card) + Send,
    {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut card = find_card(&tx, id)?.ok_or_else(|| DomainError::card_not_found(id))?;
        let (list_id, position) = (card.list_id, card.position);
        mutate(&mut card);
        card.list_id = list_id;
        card.position = position;
        card.updated_at = now_millis();
        write_card_fields(&tx, &card)?;

        tx.commit()?;
        Ok(card)
    }

    /// Insert a card after the last card of its list, ignoring `entity.position`
    pub async fn append(&self, entity: &Card) -> DomainResult<Card> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let card = insert_card(&tx, entity, None)?;

        tx.commit()?;
        Ok(card)
    }
}

#[async_trait]
impl Repository<Card> for CardRepository {
    async fn create(&self, entity: &Card) -> DomainResult<Card> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let card = insert_card(&tx, entity, Some(entity.position))?;

        tx.commit()?;
        Ok(card)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_card(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Card>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cards ORDER BY list_id, position, id",
            CARD_COLUMNS
        ))?;
        let cards = stmt
            .query_map([], row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    async fn update(&self, entity: &Card) -> DomainResult<Card> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut card = entity.clone();
        card.updated_at = now_millis();
        if write_card_fields(conn, &card)? == 0 {
            return Err(DomainError::card_not_found(entity.id));
        }
        find_card(conn, entity.id)?.ok_or_else(|| DomainError::card_not_found(entity.id))
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let list_id = CARD_SIBLINGS
            .parent_of(&tx, id)?
            .ok_or_else(|| DomainError::card_not_found(id))?;
        tx.execute("DELETE FROM cards WHERE id = ?", params![id])?;
        CARD_SIBLINGS.reindex(&tx, list_id)?;

        tx.commit()?;
        Ok(())
    }
}

/// Insert a card at `position` (or append when `None`) and renumber its list
fn insert_card(conn: &Connection, entity: &Card, position: Option<i32>) -> DomainResult<Card> {
    if !row_exists(conn, "lists", entity.list_id)? {
        return Err(DomainError::list_not_found(entity.list_id));
    }
    let siblings = CARD_SIBLINGS.ordered_ids(conn, entity.list_id)?;
    let requested = match position {
        Some(position) => position,
        None => CARD_SIBLINGS.next_position(conn, entity.list_id)?,
    };

    let now = now_millis();
    conn.execute(
        "INSERT INTO cards (list_id, title, description, position, activity_id, member_id, status, labels, start_at, due_at, reminder_at, checklist, attachments, created_at, updated_at)
         VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
        params![
            entity.list_id,
            entity.title,
            entity.description,
            entity.activity_id,
            entity.member_id,
            entity.status.as_str(),
            to_json(&entity.labels)?,
            entity.dates.start_at.map(|d| d.timestamp_millis()),
            entity.dates.due_at.map(|d| d.timestamp_millis()),
            entity.dates.reminder_at.map(|d| d.timestamp_millis()),
            to_json(&entity.checklist)?,
            to_json(&entity.attachments)?,
            now,
        ],
    )?;
    let id = last_insert_id(conn)?;

    let order = PositionAllocator::place(&siblings, id, requested);
    CARD_SIBLINGS.apply_order(conn, &order)?;

    find_card(conn, id)?
        .ok_or_else(|| DomainError::Internal(format!("Card {} vanished after insert", id)))
}

/// Find a card by id on an already-locked connection
pub(crate) fn find_card(conn: &Connection, id: u32) -> DomainResult<Option<Card>> {
    let card = conn
        .query_row(
            &format!("SELECT {} FROM cards WHERE id = ?", CARD_COLUMNS),
            params![id],
            row_to_card,
        )
        .optional()?;
    Ok(card)
}

/// Cards of one list in position order
pub(crate) fn cards_by_list(conn: &Connection, list_id: u32) -> DomainResult<Vec<Card>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM cards WHERE list_id = ? ORDER BY position, id",
        CARD_COLUMNS
    ))?;
    let cards = stmt
        .query_map(params![list_id], row_to_card)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cards)
}

/// Persist content and metadata columns. Returns the number of rows touched.
fn write_card_fields(conn: &Connection, card: &Card) -> DomainResult<usize> {
    let changed = conn.execute(
        "UPDATE cards SET title = ?1, description = ?2, activity_id = ?3, member_id = ?4, status = ?5, labels = ?6, start_at = ?7, due_at = ?8, reminder_at = ?9, checklist = ?10, attachments = ?11, updated_at = ?12 WHERE id = ?13",
        params![
            card.title,
            card.description,
            card.activity_id,
            card.member_id,
            card.status.as_str(),
            to_json(&card.labels)?,
            card.dates.start_at.map(|d| d.timestamp_millis()),
            card.dates.due_at.map(|d| d.timestamp_millis()),
            card.dates.reminder_at.map(|d| d.timestamp_millis()),
            to_json(&card.checklist)?,
            to_json(&card.attachments)?,
            card.updated_at,
            card.id,
        ],
    )?;
    Ok(changed)
}

/// Convert a database row to Card
pub(crate) fn row_to_card(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        list_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        position: row.get(4)?,
        activity_id: row.get(5)?,
        member_id: row.get(6)?,
        status: CardStatus::from_str(&row.get::<_, String>(7)?),
        labels: json_column(row, 8)?,
        dates: CardDates {
            start_at: millis_column(row, 9)?,
            due_at: millis_column(row, 10)?,
            reminder_at: millis_column(row, 11)?,
        },
        checklist: json_column(row, 12)?,
        attachments: json_column(row, 13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn millis_column(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let millis: Option<i64> = row.get(idx)?;
    Ok(millis.and_then(DateTime::<Utc>::from_timestamp_millis))
}

fn to_json<T: Serialize>(value: &Option<T>) -> DomainResult<Option<String>> {
    Ok(value.as_ref().map(serde_json::to_string).transpose()?)
}
