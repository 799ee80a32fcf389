pub mod card;
pub mod deck;
pub mod history;
pub mod study;
