//! Live card list for one deck, kept in step with repository writes
//!
//! Entries are matched by card id, never by a remembered position, so a
//! batch of deletions cannot remove the wrong card after an earlier removal
//! shifted the list.

use uuid::Uuid;

use super::error::{FlashcardError, Result};
use super::models::{Card, Deck};
use super::repository::DeckRepository;
use super::session::StudySession;
use super::store::CardStore;

pub struct CardList<'r, S> {
    repo: &'r mut DeckRepository<S>,
    deck: Deck,
    cards: Vec<Card>,
}

impl<'r, S: CardStore> CardList<'r, S> {
    pub fn load(repo: &'r mut DeckRepository<S>, deck_id: Uuid) -> Result<Self> {
        let deck = repo.get_deck(deck_id)?;
        let cards = repo.fetch_cards(deck_id)?;
        Ok(Self { repo, deck, cards })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, offset: usize) -> Option<&Card> {
        self.cards.get(offset)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Re-read the deck's cards from the repository
    pub fn refresh(&mut self) -> Result<()> {
        self.cards = self.repo.fetch_cards(self.deck.id)?;
        Ok(())
    }

    pub fn add(&mut self, term: &str, definition: &str) -> Result<&Card> {
        let card = self.repo.add_card(self.deck.id, term, definition)?;
        // Positions only grow within a deck, so a new card sorts last.
        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub fn update(&mut self, card_id: Uuid, term: &str, definition: &str) -> Result<&Card> {
        let Some(offset) = self.offset_of(card_id) else {
            return Err(FlashcardError::CardNotFound(card_id));
        };

        match self.repo.update_card(card_id, term, definition) {
            Ok(updated) => {
                self.cards[offset] = updated;
                Ok(&self.cards[offset])
            }
            Err(err) => {
                if matches!(err, FlashcardError::CardNotFound(_)) {
                    self.remove_entry(card_id);
                }
                Err(err)
            }
        }
    }

    /// Returns `false` if the card is not in this list or was already gone
    /// from the store; the list is left without it either way.
    pub fn delete(&mut self, card_id: Uuid) -> Result<bool> {
        if self.offset_of(card_id).is_none() {
            log::debug!("Card {} is not in deck {}", card_id, self.deck.id);
            return Ok(false);
        }
        let removed = self.repo.delete_card(card_id)?;
        self.remove_entry(card_id);
        Ok(removed)
    }

    /// Delete the cards at the given offsets. All offsets are checked and
    /// mapped to card ids before anything is deleted.
    pub fn delete_at(&mut self, offsets: &[usize]) -> Result<usize> {
        let len = self.cards.len();
        if let Some(&position) = offsets.iter().find(|&&o| o >= len) {
            return Err(FlashcardError::InvalidPosition { position, len });
        }

        let mut targets: Vec<(usize, Uuid)> =
            offsets.iter().map(|&o| (o, self.cards[o].id)).collect();
        targets.sort_by(|a, b| b.0.cmp(&a.0));
        targets.dedup_by_key(|t| t.0);

        let mut removed = 0;
        for (_, card_id) in targets {
            if self.delete(card_id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Start a study session over a snapshot of the current list
    pub fn start_session(&self) -> Result<StudySession> {
        StudySession::start(self.cards.clone())
    }

    fn offset_of(&self, card_id: Uuid) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    fn remove_entry(&mut self, card_id: Uuid) {
        self.cards.retain(|c| c.id != card_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::ActivityLog;
    use crate::flashcards::store::{MemoryStore, StoreError, StoreResult};

    /// Memory store whose writes can be made to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl FlakyStore {
        fn check(&self) -> StoreResult<()> {
            if self.fail_writes {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            Ok(())
        }
    }

    impl CardStore for FlakyStore {
        fn list_decks(&self) -> StoreResult<Vec<Deck>> {
            self.inner.list_decks()
        }
        fn get_deck(&self, id: Uuid) -> StoreResult<Option<Deck>> {
            self.inner.get_deck(id)
        }
        fn insert_deck(&mut self, deck: &Deck) -> StoreResult<()> {
            self.check()?;
            self.inner.insert_deck(deck)
        }
        fn update_deck(&mut self, deck: &Deck) -> StoreResult<bool> {
            self.check()?;
            self.inner.update_deck(deck)
        }
        fn remove_deck(&mut self, id: Uuid) -> StoreResult<bool> {
            self.check()?;
            self.inner.remove_deck(id)
        }
        fn cards_by_deck(&self, deck_id: Uuid) -> StoreResult<Vec<Card>> {
            self.inner.cards_by_deck(deck_id)
        }
        fn get_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
            self.inner.get_card(id)
        }
        fn insert_card(&mut self, card: &Card) -> StoreResult<()> {
            self.check()?;
            self.inner.insert_card(card)
        }
        fn update_card(&mut self, card: &Card) -> StoreResult<bool> {
            self.check()?;
            self.inner.update_card(card)
        }
        fn remove_card(&mut self, id: Uuid) -> StoreResult<bool> {
            self.check()?;
            self.inner.remove_card(id)
        }
        fn append_activity(&mut self, entry: &ActivityLog) -> StoreResult<()> {
            self.check()?;
            self.inner.append_activity(entry)
        }
        fn list_activity(&self) -> StoreResult<Vec<ActivityLog>> {
            self.inner.list_activity()
        }
    }

    fn setup(terms: &[&str]) -> (DeckRepository<MemoryStore>, Uuid) {
        let mut repo = DeckRepository::new(MemoryStore::new());
        let deck = repo.create_deck("Deck").unwrap();
        for term in terms {
            repo.add_card(deck.id, term, &format!("{} def", term)).unwrap();
        }
        (repo, deck.id)
    }

    fn terms<S: CardStore>(list: &CardList<'_, S>) -> Vec<String> {
        list.cards().iter().map(|c| c.term.clone()).collect()
    }

    fn assert_matches_repo<S: CardStore>(list: &CardList<'_, S>) {
        let stored = list.repo.fetch_cards(list.deck().id).unwrap();
        assert_eq!(list.cards(), stored.as_slice());
    }

    #[test]
    fn test_load_and_add() {
        let (mut repo, deck_id) = setup(&["a", "b"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        assert_eq!(terms(&list), vec!["a", "b"]);

        let added = list.add("Swift Testing", "...").unwrap().clone();
        assert_eq!(added.deck_id, Some(deck_id));
        assert_eq!(terms(&list), vec!["a", "b", "Swift Testing"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_update_replaces_entry() {
        let (mut repo, deck_id) = setup(&["a", "b"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        let id = list.get(1).unwrap().id;

        list.update(id, "newTerm", "newDef").unwrap();
        assert_eq!(list.get(1).unwrap().id, id);
        assert_eq!(list.get(1).unwrap().term, "newTerm");
        assert_eq!(list.get(1).unwrap().definition, "newDef");
        assert_matches_repo(&list);
    }

    #[test]
    fn test_update_of_deleted_card_drops_entry() {
        let (mut repo, deck_id) = setup(&["a", "b"]);
        let id = repo.fetch_cards(deck_id).unwrap()[0].id;
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        list.repo.delete_card(id).unwrap();

        let err = list.update(id, "x", "y").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(terms(&list), vec!["b"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_delete_by_id() {
        let (mut repo, deck_id) = setup(&["a", "b", "c"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        let id = list.get(1).unwrap().id;

        assert!(list.delete(id).unwrap());
        assert_eq!(terms(&list), vec!["a", "c"]);

        assert!(!list.delete(id).unwrap());
        assert!(!list.delete(Uuid::new_v4()).unwrap());
        assert_eq!(terms(&list), vec!["a", "c"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_delete_at_resolves_ids_first() {
        let (mut repo, deck_id) = setup(&["a", "b", "c"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();

        assert_eq!(list.delete_at(&[0, 2]).unwrap(), 2);
        assert_eq!(terms(&list), vec!["b"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_delete_at_any_order_and_duplicates() {
        let (mut repo, deck_id) = setup(&["a", "b", "c", "d"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();

        assert_eq!(list.delete_at(&[3, 1, 3]).unwrap(), 2);
        assert_eq!(terms(&list), vec!["a", "c"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_delete_at_out_of_range_deletes_nothing() {
        let (mut repo, deck_id) = setup(&["a", "b", "c"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();

        let err = list.delete_at(&[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            FlashcardError::InvalidPosition { position: 3, len: 3 }
        ));
        assert_eq!(terms(&list), vec!["a", "b", "c"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_failed_writes_leave_list_unchanged() {
        let mut repo = DeckRepository::new(FlakyStore::default());
        let deck = repo.create_deck("Deck").unwrap();
        repo.add_card(deck.id, "a", "1").unwrap();
        let mut list = CardList::load(&mut repo, deck.id).unwrap();
        let id = list.get(0).unwrap().id;

        list.repo.store_mut().fail_writes = true;
        assert!(matches!(
            list.add("b", "2"),
            Err(FlashcardError::Persistence(_))
        ));
        assert!(matches!(
            list.update(id, "changed", "2"),
            Err(FlashcardError::Persistence(_))
        ));
        assert!(matches!(list.delete(id), Err(FlashcardError::Persistence(_))));

        assert_eq!(terms(&list), vec!["a"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_session_snapshot_ignores_later_edits() {
        let (mut repo, deck_id) = setup(&["a", "b"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        let session = list.start_session().unwrap();

        let id = list.get(0).unwrap().id;
        list.update(id, "edited", "").unwrap();
        list.delete_at(&[1]).unwrap();

        assert_eq!(session.card_count(), 2);
        assert_eq!(session.current_card().unwrap().term, "a");
    }

    #[test]
    fn test_refresh_picks_up_store_changes() {
        let (mut repo, deck_id) = setup(&["a"]);
        let mut list = CardList::load(&mut repo, deck_id).unwrap();
        list.repo.add_card(deck_id, "b", "").unwrap();
        assert_eq!(terms(&list), vec!["a"]);

        list.refresh().unwrap();
        assert_eq!(terms(&list), vec!["a", "b"]);
        assert_matches_repo(&list);
    }

    #[test]
    fn test_empty_list_cannot_start_session() {
        let (mut repo, deck_id) = setup(&[]);
        let list = CardList::load(&mut repo, deck_id).unwrap();
        assert!(list.is_empty());
        assert!(matches!(
            list.start_session(),
            Err(FlashcardError::EmptySession)
        ));
    }
}
