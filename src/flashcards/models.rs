//! Data models for decks, cards and the activity log

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of cards (shown to users as a "folder")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A vocabulary card: a term on the front, its definition on the back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    /// Owning deck. `None` while a card is being composed outside any deck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<Uuid>,
    /// Insertion sequence within the owning deck
    #[serde(default)]
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(term: String, definition: String, deck_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            term,
            definition,
            deck_id,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Listing order: insertion sequence within the deck, then creation time.
    /// The wall clock is only a tie-breaker, so a clock step backwards cannot
    /// move a newer card ahead of an older one.
    pub fn listing_order(a: &Card, b: &Card) -> Ordering {
        a.position
            .cmp(&b.position)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    }
}

/// Kind of event recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    /// A study session ran through every card of a deck
    StudyCompleted,
}

/// An append-only activity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: Uuid,
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<Uuid>,
    #[serde(default)]
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(kind: ActivityKind, deck_id: Option<Uuid>, card_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            deck_id,
            card_count,
            created_at: Utc::now(),
        }
    }

    pub fn study_completed(deck_id: Uuid, card_count: usize) -> Self {
        Self::new(ActivityKind::StudyCompleted, Some(deck_id), card_count)
    }
}
