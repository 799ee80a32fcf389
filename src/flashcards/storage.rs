//! On-disk storage for flashcards
//!
//! Directory structure:
//! ```text
//! {data_dir}/
//! ├── decks.json           # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json   # Individual card files
//! └── activity.jsonl       # Append-only activity log
//! ```

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use uuid::Uuid;

use super::models::{ActivityLog, Card, Deck};
use super::store::{CardStore, StoreError, StoreResult};

/// JSON file store rooted at a data directory
pub struct FlashcardStorage {
    base_path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn decks_path(&self) -> PathBuf {
        self.base_path.join("decks.json")
    }

    fn cards_dir(&self) -> PathBuf {
        self.base_path.join("cards")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn activity_path(&self) -> PathBuf {
        self.base_path.join("activity.jsonl")
    }

    /// Create the directory layout and an empty decks.json
    pub fn init(&self) -> StoreResult<()> {
        fs::create_dir_all(self.cards_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty_decks: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty_decks)?)?;
        }

        Ok(())
    }

    fn save_decks(&self, decks: &[Deck]) -> StoreResult<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }

    fn write_card(&self, card: &Card) -> StoreResult<()> {
        fs::create_dir_all(self.cards_dir())?;
        fs::write(self.card_path(card.id), serde_json::to_string_pretty(card)?)?;
        Ok(())
    }

    fn read_all_cards(&self) -> StoreResult<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                cards.push(serde_json::from_str(&content)?);
            }
        }
        Ok(cards)
    }
}

impl CardStore for FlashcardStorage {
    fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    fn get_deck(&self, id: Uuid) -> StoreResult<Option<Deck>> {
        Ok(self.list_decks()?.into_iter().find(|d| d.id == id))
    }

    fn insert_deck(&mut self, deck: &Deck) -> StoreResult<()> {
        let mut decks = self.list_decks()?;
        if decks.iter().any(|d| d.id == deck.id) {
            return Err(StoreError::Duplicate(deck.id));
        }
        decks.push(deck.clone());
        self.save_decks(&decks)?;
        log::debug!("Stored deck {} in {:?}", deck.id, self.decks_path());
        Ok(())
    }

    fn update_deck(&mut self, deck: &Deck) -> StoreResult<bool> {
        let mut decks = self.list_decks()?;
        let Some(pos) = decks.iter().position(|d| d.id == deck.id) else {
            return Ok(false);
        };
        decks[pos] = deck.clone();
        self.save_decks(&decks)?;
        Ok(true)
    }

    fn remove_deck(&mut self, id: Uuid) -> StoreResult<bool> {
        let mut decks = self.list_decks()?;
        let before = decks.len();
        decks.retain(|d| d.id != id);
        if decks.len() == before {
            return Ok(false);
        }
        self.save_decks(&decks)?;
        Ok(true)
    }

    fn cards_by_deck(&self, deck_id: Uuid) -> StoreResult<Vec<Card>> {
        let mut cards = self.read_all_cards()?;
        cards.retain(|c| c.deck_id == Some(deck_id));
        Ok(cards)
    }

    fn get_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        let card_path = self.card_path(id);
        if !card_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&card_path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn insert_card(&mut self, card: &Card) -> StoreResult<()> {
        if self.card_path(card.id).exists() {
            return Err(StoreError::Duplicate(card.id));
        }
        self.write_card(card)?;
        log::debug!("Stored card {}", card.id);
        Ok(())
    }

    fn update_card(&mut self, card: &Card) -> StoreResult<bool> {
        if !self.card_path(card.id).exists() {
            return Ok(false);
        }
        self.write_card(card)?;
        Ok(true)
    }

    fn remove_card(&mut self, id: Uuid) -> StoreResult<bool> {
        let card_path = self.card_path(id);
        if !card_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&card_path)?;
        Ok(true)
    }

    fn append_activity(&mut self, entry: &ActivityLog) -> StoreResult<()> {
        fs::create_dir_all(&self.base_path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.activity_path())?;

        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    fn list_activity(&self) -> StoreResult<Vec<ActivityLog>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<ActivityLog>(trimmed) {
                Ok(entry) => entries.push(entry),
                // A torn final line from an interrupted append
                Err(e) => log::warn!("Skipping unreadable activity entry: {}", e),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FlashcardStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlashcardStorage::new(temp_dir.path().to_path_buf());
        storage.init().unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_init_creates_layout() {
        let (storage, temp) = create_test_storage();
        assert!(temp.path().join("decks.json").exists());
        assert!(temp.path().join("cards").is_dir());
        assert!(storage.list_decks().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_reads_same_data() {
        let (mut storage, temp) = create_test_storage();
        let deck = Deck::new("Vocabulary".to_string());
        storage.insert_deck(&deck).unwrap();
        let card = Card::new("term".to_string(), "definition".to_string(), Some(deck.id));
        storage.insert_card(&card).unwrap();

        let reopened = FlashcardStorage::new(temp.path().to_path_buf());
        assert_eq!(reopened.list_decks().unwrap(), vec![deck.clone()]);
        assert_eq!(reopened.cards_by_deck(deck.id).unwrap(), vec![card.clone()]);
        assert_eq!(reopened.get_card(card.id).unwrap(), Some(card));
    }

    #[test]
    fn test_update_and_remove_card() {
        let (mut storage, _temp) = create_test_storage();
        let mut card = Card::new("old".to_string(), String::new(), None);
        storage.insert_card(&card).unwrap();

        card.term = "new".to_string();
        assert!(storage.update_card(&card).unwrap());
        assert_eq!(storage.get_card(card.id).unwrap().unwrap().term, "new");

        assert!(storage.remove_card(card.id).unwrap());
        assert!(!storage.remove_card(card.id).unwrap());
        assert!(!storage.update_card(&card).unwrap());
        assert_eq!(storage.get_card(card.id).unwrap(), None);
    }

    #[test]
    fn test_deck_update_and_remove() {
        let (mut storage, _temp) = create_test_storage();
        let mut deck = Deck::new("Old".to_string());
        storage.insert_deck(&deck).unwrap();
        assert!(matches!(
            storage.insert_deck(&deck),
            Err(StoreError::Duplicate(_))
        ));

        deck.name = "New".to_string();
        assert!(storage.update_deck(&deck).unwrap());
        assert_eq!(storage.get_deck(deck.id).unwrap().unwrap().name, "New");

        assert!(storage.remove_deck(deck.id).unwrap());
        assert!(!storage.remove_deck(deck.id).unwrap());
        assert!(!storage.update_deck(&deck).unwrap());
    }

    #[test]
    fn test_activity_log_appends() {
        let (mut storage, temp) = create_test_storage();
        let deck_id = Uuid::new_v4();
        storage
            .append_activity(&ActivityLog::study_completed(deck_id, 3))
            .unwrap();
        storage
            .append_activity(&ActivityLog::study_completed(deck_id, 5))
            .unwrap();

        let content = fs::read_to_string(temp.path().join("activity.jsonl")).unwrap();
        assert_eq!(content.lines().count(), 2);

        let entries = storage.list_activity().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].card_count, 5);
        assert_eq!(entries[0].deck_id, Some(deck_id));
    }

    #[test]
    fn test_missing_directory_reads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = FlashcardStorage::new(temp.path().join("absent"));
        assert!(storage.list_decks().unwrap().is_empty());
        assert!(storage.cards_by_deck(Uuid::new_v4()).unwrap().is_empty());
        assert!(storage.list_activity().unwrap().is_empty());
    }
}
