//! Vocabulary flashcards for Tango
//!
//! This module provides:
//! - Deck and card models plus the activity log record
//! - A storage trait with in-memory and JSON-on-disk stores
//! - Deck-scoped repository operations
//! - A live card list that follows repository writes
//! - The sequential study session
//! - The definition generator seam

pub mod card_list;
pub mod error;
pub mod generator;
pub mod models;
pub mod repository;
pub mod session;
pub mod storage;
pub mod store;

pub use card_list::CardList;
pub use error::{FlashcardError, Result};
pub use generator::{CommandGenerator, DefinitionGenerator, GenerationError};
pub use models::*;
pub use repository::DeckRepository;
pub use session::{SessionState, StudySession};
pub use storage::FlashcardStorage;
pub use store::{CardStore, MemoryStore, StoreError};
