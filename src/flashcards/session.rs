//! Sequential study session over a fixed list of cards
//!
//! The session owns its snapshot of the cards: edits made to the deck after
//! the session starts are not seen by it. Every card starts face up (term
//! side); `advance` turns the next card face up again no matter how the
//! previous one was left.

use super::error::{FlashcardError, Result};
use super::models::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Presenting { index: usize, face_up: bool },
    Completed,
}

#[derive(Debug, Clone)]
pub struct StudySession {
    cards: Vec<Card>,
    state: SessionState,
}

impl StudySession {
    pub fn start(cards: Vec<Card>) -> Result<Self> {
        if cards.is_empty() {
            return Err(FlashcardError::EmptySession);
        }
        Ok(Self {
            cards,
            state: SessionState::Presenting {
                index: 0,
                face_up: true,
            },
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn current_card(&self) -> Option<&Card> {
        match self.state {
            SessionState::Presenting { index, .. } => self.cards.get(index),
            SessionState::Completed => None,
        }
    }

    pub fn face_up(&self) -> bool {
        match self.state {
            SessionState::Presenting { face_up, .. } => face_up,
            SessionState::Completed => true,
        }
    }

    /// Text on the visible side of the current card
    pub fn visible_text(&self) -> Option<&str> {
        let card = self.current_card()?;
        if self.face_up() {
            Some(&card.term)
        } else {
            Some(&card.definition)
        }
    }

    /// "position / total", 1-indexed
    pub fn progress_text(&self) -> String {
        let total = self.cards.len();
        let position = match self.state {
            SessionState::Presenting { index, .. } => index + 1,
            SessionState::Completed => total,
        };
        format!("{} / {}", position, total)
    }

    pub fn flip(&mut self) {
        if let SessionState::Presenting { face_up, .. } = &mut self.state {
            *face_up = !*face_up;
        }
    }

    pub fn advance(&mut self) {
        if let SessionState::Presenting { index, .. } = self.state {
            self.state = if index + 1 < self.cards.len() {
                SessionState::Presenting {
                    index: index + 1,
                    face_up: true,
                }
            } else {
                SessionState::Completed
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("term {}", i), format!("definition {}", i), None))
            .collect()
    }

    #[test]
    fn test_empty_session_rejected() {
        assert!(matches!(
            StudySession::start(Vec::new()),
            Err(FlashcardError::EmptySession)
        ));
    }

    #[test]
    fn test_start_state() {
        for n in 1..5 {
            let session = StudySession::start(cards(n)).unwrap();
            assert_eq!(
                session.state(),
                SessionState::Presenting {
                    index: 0,
                    face_up: true
                }
            );
            assert_eq!(session.progress_text(), format!("1 / {}", n));
            assert_eq!(session.visible_text(), Some("term 0"));
        }
    }

    #[test]
    fn test_flip_toggles_without_moving() {
        let mut session = StudySession::start(cards(3)).unwrap();
        session.advance();

        session.flip();
        assert!(!session.face_up());
        assert_eq!(session.visible_text(), Some("definition 1"));
        assert_eq!(session.current_card().unwrap().term, "term 1");

        session.flip();
        assert!(session.face_up());
        assert_eq!(session.progress_text(), "2 / 3");
    }

    #[test]
    fn test_advance_resets_face_up() {
        let mut session = StudySession::start(cards(2)).unwrap();
        session.flip();
        session.advance();
        assert_eq!(
            session.state(),
            SessionState::Presenting {
                index: 1,
                face_up: true
            }
        );

        session.flip();
        session.advance();
        assert!(session.is_completed());
        assert!(session.face_up());
    }

    #[test]
    fn test_completes_after_exactly_count_advances() {
        for n in 1..6 {
            let mut session = StudySession::start(cards(n)).unwrap();
            for _ in 0..n - 1 {
                session.advance();
                assert!(!session.is_completed());
            }
            session.advance();
            assert!(session.is_completed());
            assert_eq!(session.current_card(), None);
            assert_eq!(session.progress_text(), format!("{} / {}", n, n));
        }
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut session = StudySession::start(cards(1)).unwrap();
        session.advance();
        session.flip();
        session.advance();
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.face_up());
        assert_eq!(session.visible_text(), None);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut source = cards(2);
        let session = StudySession::start(source.clone()).unwrap();
        source[0].term = "edited".to_string();
        source.clear();
        assert_eq!(session.card_count(), 2);
        assert_eq!(session.current_card().unwrap().term, "term 0");
    }
}
