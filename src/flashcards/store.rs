//! Object store abstraction for decks, cards and activity records
//!
//! Absence is reported through `Option`/`bool`; `StoreError` is reserved for
//! reads and writes that actually failed.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use super::models::{ActivityLog, Card, Deck};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record already exists: {0}")]
    Duplicate(Uuid),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Create/read/update/delete by identifier plus query-by-owner
pub trait CardStore {
    fn list_decks(&self) -> StoreResult<Vec<Deck>>;
    fn get_deck(&self, id: Uuid) -> StoreResult<Option<Deck>>;
    fn insert_deck(&mut self, deck: &Deck) -> StoreResult<()>;
    /// Returns `false` if no deck with this id is stored
    fn update_deck(&mut self, deck: &Deck) -> StoreResult<bool>;
    fn remove_deck(&mut self, id: Uuid) -> StoreResult<bool>;

    /// All cards whose `deck_id` is `deck_id`, in no particular order
    fn cards_by_deck(&self, deck_id: Uuid) -> StoreResult<Vec<Card>>;
    fn get_card(&self, id: Uuid) -> StoreResult<Option<Card>>;
    fn insert_card(&mut self, card: &Card) -> StoreResult<()>;
    fn update_card(&mut self, card: &Card) -> StoreResult<bool>;
    fn remove_card(&mut self, id: Uuid) -> StoreResult<bool>;

    fn append_activity(&mut self, entry: &ActivityLog) -> StoreResult<()>;
    fn list_activity(&self) -> StoreResult<Vec<ActivityLog>>;
}

/// In-memory store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    decks: HashMap<Uuid, Deck>,
    cards: HashMap<Uuid, Card>,
    activity: Vec<ActivityLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardStore for MemoryStore {
    fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        Ok(self.decks.values().cloned().collect())
    }

    fn get_deck(&self, id: Uuid) -> StoreResult<Option<Deck>> {
        Ok(self.decks.get(&id).cloned())
    }

    fn insert_deck(&mut self, deck: &Deck) -> StoreResult<()> {
        if self.decks.contains_key(&deck.id) {
            return Err(StoreError::Duplicate(deck.id));
        }
        self.decks.insert(deck.id, deck.clone());
        Ok(())
    }

    fn update_deck(&mut self, deck: &Deck) -> StoreResult<bool> {
        match self.decks.get_mut(&deck.id) {
            Some(existing) => {
                *existing = deck.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_deck(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(self.decks.remove(&id).is_some())
    }

    fn cards_by_deck(&self, deck_id: Uuid) -> StoreResult<Vec<Card>> {
        Ok(self
            .cards
            .values()
            .filter(|c| c.deck_id == Some(deck_id))
            .cloned()
            .collect())
    }

    fn get_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        Ok(self.cards.get(&id).cloned())
    }

    fn insert_card(&mut self, card: &Card) -> StoreResult<()> {
        if self.cards.contains_key(&card.id) {
            return Err(StoreError::Duplicate(card.id));
        }
        self.cards.insert(card.id, card.clone());
        Ok(())
    }

    fn update_card(&mut self, card: &Card) -> StoreResult<bool> {
        match self.cards.get_mut(&card.id) {
            Some(existing) => {
                *existing = card.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_card(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(self.cards.remove(&id).is_some())
    }

    fn append_activity(&mut self, entry: &ActivityLog) -> StoreResult<()> {
        self.activity.push(entry.clone());
        Ok(())
    }

    fn list_activity(&self) -> StoreResult<Vec<ActivityLog>> {
        Ok(self.activity.clone())
    }
}
