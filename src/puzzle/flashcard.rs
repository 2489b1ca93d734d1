use rand::Rng;
use rand::seq::SliceRandom;

use crate::puzzle::letters::{self, is_concealable, same_letter};
use crate::puzzle::{Letter, Slot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    Revealed { index: usize, ch: char },
    AlreadyComplete,
}

/// Blanks-and-letters puzzle: every letter starts hidden and is uncovered by
/// suggestions, hints or a full reveal.
#[derive(Clone, Debug)]
pub struct FlashcardPuzzle {
    target: String,
    chars: Vec<char>,
    slots: Vec<Slot>,
}

impl FlashcardPuzzle {
    pub fn new(target: &str) -> Self {
        let target = letters::nfc(target).into_owned();
        let chars: Vec<char> = target.chars().collect();
        let slots = chars
            .iter()
            .map(|&ch| {
                if is_concealable(ch) {
                    Slot::Hidden
                } else {
                    Slot::Shown(ch)
                }
            })
            .collect();
        Self {
            target,
            chars,
            slots,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Reveal every hidden occurrence of `letter`. Returns how many slots
    /// were uncovered; zero is a normal answer, not an error.
    pub fn suggest_letter(&mut self, letter: Letter) -> usize {
        let wanted = letter.as_char();
        let mut revealed = 0;
        for (slot, &ch) in self.slots.iter_mut().zip(&self.chars) {
            if *slot == Slot::Hidden && same_letter(ch, wanted) {
                *slot = Slot::Shown(ch);
                revealed += 1;
            }
        }
        revealed
    }

    pub fn give_hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> HintOutcome {
        let hidden = self.hidden_indices();
        match hidden.choose(rng) {
            Some(&index) => {
                let ch = self.chars[index];
                self.slots[index] = Slot::Shown(ch);
                HintOutcome::Revealed { index, ch }
            }
            None => HintOutcome::AlreadyComplete,
        }
    }

    pub fn reveal_all(&mut self) {
        for (slot, &ch) in self.slots.iter_mut().zip(&self.chars) {
            *slot = Slot::Shown(ch);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| matches!(s, Slot::Shown(_)))
    }

    pub fn hidden_count(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Hidden).count()
    }

    /// Fraction of concealable slots already uncovered.
    pub fn progress(&self) -> f64 {
        let concealable = self.chars.iter().filter(|&&ch| is_concealable(ch)).count();
        if concealable == 0 {
            return 1.0;
        }
        (concealable - self.hidden_count()) as f64 / concealable as f64
    }

    fn hidden_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Slot::Hidden)
            .map(|(i, _)| i)
            .collect()
    }
}
