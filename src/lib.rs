pub mod config;
pub mod flashcards;
