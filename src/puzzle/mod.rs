pub mod flashcard;
pub mod letters;
pub mod scramble;
pub mod selector;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use flashcard::{FlashcardPuzzle, HintOutcome};
pub use scramble::ScramblePuzzle;

pub const PLACEHOLDER: char = '_';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Flashcard,
    Scramble,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Flashcard => "flashcard",
            Mode::Scramble => "scramble",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Flashcard => Mode::Scramble,
            Mode::Scramble => Mode::Flashcard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("no word is currently selected")]
    NoActiveSession,
    #[error("there are no words to choose from")]
    EmptyPool,
    #[error("expected exactly one letter, got {0:?}")]
    InvalidLetterInput(String),
    #[error("this action is only available in flashcard mode")]
    ScrambleMode,
}

/// A single character the learner proposes, already trimmed and NFC-composed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letter(char);

impl Letter {
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let composed = letters::nfc(input.trim());
        let mut chars = composed.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Self(ch)),
            _ => Err(PuzzleError::InvalidLetterInput(input.to_string())),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Shown(char),
    Hidden,
}

/// Space-joined rendering, hidden slots drawn as `placeholder`.
pub fn render_slots(slots: &[Slot], placeholder: char) -> String {
    join_chars(slots.iter().map(|slot| match *slot {
        Slot::Shown(ch) => ch,
        Slot::Hidden => placeholder,
    }))
}

fn join_chars(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    for (i, ch) in chars.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// One round of play. Built fresh for every selected word and dropped when
/// the next word is chosen.
#[derive(Clone, Debug)]
pub enum PuzzleSession {
    Flashcard(FlashcardPuzzle),
    Scramble(ScramblePuzzle),
}

impl PuzzleSession {
    pub fn new<R: Rng + ?Sized>(target: &str, mode: Mode, rng: &mut R) -> Self {
        match mode {
            Mode::Flashcard => PuzzleSession::Flashcard(FlashcardPuzzle::new(target)),
            Mode::Scramble => PuzzleSession::Scramble(ScramblePuzzle::new(target, rng)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            PuzzleSession::Flashcard(_) => Mode::Flashcard,
            PuzzleSession::Scramble(_) => Mode::Scramble,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            PuzzleSession::Flashcard(p) => p.target(),
            PuzzleSession::Scramble(p) => p.target(),
        }
    }

    pub fn render(&self, placeholder: char) -> String {
        match self {
            PuzzleSession::Flashcard(p) => render_slots(p.slots(), placeholder),
            PuzzleSession::Scramble(p) => join_chars(p.display().iter().copied()),
        }
    }

    /// Case-insensitive comparison against the target. Never touches the display.
    pub fn check_guess(&self, guess: &str) -> bool {
        letters::eq_ignore_case(guess, self.target())
    }

    /// Show the whole word in order, whatever the mode.
    pub fn reveal_all(&mut self) {
        match self {
            PuzzleSession::Flashcard(p) => p.reveal_all(),
            PuzzleSession::Scramble(p) => p.reveal(),
        }
    }

    /// True once the word is fully shown: every flashcard slot uncovered, or
    /// a scramble explicitly put back in order.
    pub fn is_revealed(&self) -> bool {
        match self {
            PuzzleSession::Flashcard(p) => p.is_complete(),
            PuzzleSession::Scramble(p) => p.is_revealed(),
        }
    }

    pub fn flashcard_mut(&mut self) -> Result<&mut FlashcardPuzzle, PuzzleError> {
        match self {
            PuzzleSession::Flashcard(p) => Ok(p),
            PuzzleSession::Scramble(_) => Err(PuzzleError::ScrambleMode),
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            PuzzleSession::Flashcard(p) => p.progress(),
            PuzzleSession::Scramble(p) => {
                if p.is_revealed() {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_letter_parse_accepts_one_char() {
        assert_eq!(Letter::parse("u").unwrap().as_char(), 'u');
        assert_eq!(Letter::parse("  é ").unwrap().as_char(), 'é');
        assert_eq!(Letter::parse("e\u{301}").unwrap().as_char(), 'é');
    }

    #[test]
    fn test_letter_parse_rejects_everything_else() {
        for input in ["", "   ", "ab", "os"] {
            assert_eq!(
                Letter::parse(input),
                Err(PuzzleError::InvalidLetterInput(input.to_string()))
            );
        }
    }

    #[test]
    fn test_flashcard_session_renders_placeholders() {
        let mut rng = SmallRng::seed_from_u64(0);
        let session = PuzzleSession::new("humérus", Mode::Flashcard, &mut rng);
        assert_eq!(session.mode(), Mode::Flashcard);
        assert_eq!(session.render(PLACEHOLDER), "_ _ _ _ _ _ _");
        assert_eq!(session.render('•'), "• • • • • • •");
    }

    #[test]
    fn test_render_keeps_spaces_as_slots() {
        let mut rng = SmallRng::seed_from_u64(0);
        let session = PuzzleSession::new("os iliaque", Mode::Flashcard, &mut rng);
        assert_eq!(session.render('_'), "_ _   _ _ _ _ _ _ _");
    }

    #[test]
    fn test_check_guess_is_case_insensitive() {
        let mut rng = SmallRng::seed_from_u64(0);
        let session = PuzzleSession::new("humérus", Mode::Flashcard, &mut rng);
        assert!(session.check_guess("HUMÉRUS"));
        assert!(session.check_guess("humérus"));
        assert!(!session.check_guess("humerus"));
        assert!(!session.check_guess("radius"));
        assert_eq!(session.render('_'), "_ _ _ _ _ _ _");
    }

    #[test]
    fn test_check_guess_in_scramble_mode() {
        let mut rng = SmallRng::seed_from_u64(4);
        let session = PuzzleSession::new("Arc de l'aorte", Mode::Scramble, &mut rng);
        assert!(session.check_guess("arc DE L'AORTE"));
    }

    #[test]
    fn test_scramble_session_refuses_flashcard_actions() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut session = PuzzleSession::new("tibia", Mode::Scramble, &mut rng);
        assert_eq!(session.flashcard_mut().err(), Some(PuzzleError::ScrambleMode));
        assert!(!session.is_revealed());
        session.reveal_all();
        assert!(session.is_revealed());
        assert_eq!(session.render('_'), "t i b i a");
    }

    #[test]
    fn test_flashcard_reveal_all_completes() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut session = PuzzleSession::new("arc de l'aorte", Mode::Flashcard, &mut rng);
        assert!(!session.is_revealed());
        session.reveal_all();
        assert!(session.is_revealed());
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::Flashcard.toggled(), Mode::Scramble);
        assert_eq!(Mode::Scramble.toggled(), Mode::Flashcard);
    }
}
