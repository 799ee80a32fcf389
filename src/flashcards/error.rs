use thiserror::Error;
use uuid::Uuid;

use super::store::StoreError;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Storage error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Cannot start a study session without cards")]
    EmptySession,

    #[error("Deck name must not be empty")]
    InvalidDeckName,

    #[error("Card term must not be empty")]
    EmptyTerm,

    #[error("Position {position} is out of range for a list of {len} cards")]
    InvalidPosition { position: usize, len: usize },
}

impl FlashcardError {
    /// Whether the error only means the record was already gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeckNotFound(_) | Self::CardNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
