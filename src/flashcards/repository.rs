//! Deck and card operations on top of a [`CardStore`]

use chrono::Utc;
use uuid::Uuid;

use super::error::{FlashcardError, Result};
use super::models::{ActivityLog, Card, Deck};
use super::store::CardStore;

pub struct DeckRepository<S> {
    store: S,
}

impl<S: CardStore> DeckRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ==================== Deck Operations ====================

    /// List all decks, oldest first
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let mut decks = self.store.list_decks()?;
        decks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(decks)
    }

    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.store
            .get_deck(deck_id)?
            .ok_or(FlashcardError::DeckNotFound(deck_id))
    }

    pub fn create_deck(&mut self, name: &str) -> Result<Deck> {
        let name = validate_deck_name(name)?;
        let deck = Deck::new(name);
        self.store.insert_deck(&deck)?;
        log::info!("Created deck \"{}\" ({})", deck.name, deck.id);
        Ok(deck)
    }

    pub fn rename_deck(&mut self, deck_id: Uuid, name: &str) -> Result<Deck> {
        let name = validate_deck_name(name)?;
        let mut deck = self.get_deck(deck_id)?;
        deck.name = name;
        deck.updated_at = Utc::now();
        if !self.store.update_deck(&deck)? {
            return Err(FlashcardError::DeckNotFound(deck_id));
        }
        Ok(deck)
    }

    /// Delete a deck and all its cards, returning how many cards went with it.
    /// An absent deck is a no-op. If any removal fails, the cards already
    /// removed are put back before the error is returned.
    pub fn delete_deck(&mut self, deck_id: Uuid) -> Result<usize> {
        let cards = self.store.cards_by_deck(deck_id)?;
        let mut removed = Vec::with_capacity(cards.len());
        for card in cards {
            match self.store.remove_card(card.id) {
                Ok(true) => removed.push(card),
                Ok(false) => {}
                Err(err) => {
                    self.restore_cards(&removed);
                    return Err(err.into());
                }
            }
        }

        match self.store.remove_deck(deck_id) {
            Ok(true) => log::info!("Deleted deck {} with {} cards", deck_id, removed.len()),
            Ok(false) => log::warn!("Deck {} was already deleted", deck_id),
            Err(err) => {
                self.restore_cards(&removed);
                return Err(err.into());
            }
        }
        Ok(removed.len())
    }

    fn restore_cards(&mut self, cards: &[Card]) {
        for card in cards {
            if let Err(err) = self.store.insert_card(card) {
                log::error!(
                    "Failed to restore card {} after aborted deck delete: {}",
                    card.id,
                    err
                );
            }
        }
    }

    // ==================== Card Operations ====================

    /// Cards owned by a deck in listing order
    pub fn fetch_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let mut cards = self.store.cards_by_deck(deck_id)?;
        cards.sort_by(Card::listing_order);
        Ok(cards)
    }

    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        self.store
            .get_card(card_id)?
            .ok_or(FlashcardError::CardNotFound(card_id))
    }

    pub fn add_card(&mut self, deck_id: Uuid, term: &str, definition: &str) -> Result<Card> {
        validate_term(term)?;
        self.get_deck(deck_id)?;

        let position = self
            .store
            .cards_by_deck(deck_id)?
            .iter()
            .map(|c| c.position + 1)
            .max()
            .unwrap_or(0);

        let mut card = Card::new(term.to_string(), definition.to_string(), Some(deck_id));
        card.position = position;
        self.store.insert_card(&card)?;

        log::info!("Added card \"{}\" to deck {}", card.term, deck_id);
        Ok(card)
    }

    /// Replace a card's term and definition. Identity, owner and creation
    /// time are kept.
    pub fn update_card(&mut self, card_id: Uuid, term: &str, definition: &str) -> Result<Card> {
        validate_term(term)?;
        let mut card = self.get_card(card_id)?;
        card.term = term.to_string();
        card.definition = definition.to_string();
        card.updated_at = Utc::now();

        if !self.store.update_card(&card)? {
            return Err(FlashcardError::CardNotFound(card_id));
        }
        Ok(card)
    }

    /// Returns `false` when the card was already gone.
    pub fn delete_card(&mut self, card_id: Uuid) -> Result<bool> {
        let removed = self.store.remove_card(card_id)?;
        if removed {
            log::info!("Deleted card {}", card_id);
        } else {
            log::warn!("Card {} was already deleted", card_id);
        }
        Ok(removed)
    }

    // ==================== Activity ====================

    pub fn record_activity(&mut self, entry: &ActivityLog) -> Result<()> {
        self.store.append_activity(entry)?;
        Ok(())
    }

    pub fn list_activity(&self) -> Result<Vec<ActivityLog>> {
        Ok(self.store.list_activity()?)
    }
}

fn validate_deck_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FlashcardError::InvalidDeckName);
    }
    Ok(trimmed.to_string())
}

fn validate_term(term: &str) -> Result<()> {
    if term.trim().is_empty() {
        return Err(FlashcardError::EmptyTerm);
    }
    Ok(())
}
