use rand::Rng;
use rand::seq::SliceRandom;

use crate::puzzle::letters::{self, is_letter};

/// All letters visible but shuffled inside each word. Completion is judged by
/// the learner (or by a typed guess), never detected here.
#[derive(Clone, Debug)]
pub struct ScramblePuzzle {
    target: String,
    display: Vec<char>,
    revealed: bool,
}

impl ScramblePuzzle {
    pub fn new<R: Rng + ?Sized>(target: &str, rng: &mut R) -> Self {
        let target = letters::nfc(target).into_owned();
        let display = shuffle_letter_runs(&target, rng);
        Self {
            target,
            display,
            revealed: false,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn display(&self) -> &[char] {
        &self.display
    }

    /// Put the letters back in order.
    pub fn reveal(&mut self) {
        self.display = self.target.chars().collect();
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// Shuffle every maximal run of letters in place; everything between runs
/// (spaces, apostrophes, hyphens, digits) keeps its position.
pub fn shuffle_letter_runs<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Vec<char> {
    let mut chars: Vec<char> = text.chars().collect();
    let mut start = 0;
    while start < chars.len() {
        if !is_letter(chars[start]) {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < chars.len() && is_letter(chars[end]) {
            end += 1;
        }
        chars[start..end].shuffle(rng);
        start = end;
    }
    chars
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn sorted(mut chars: Vec<char>) -> Vec<char> {
        chars.sort_unstable();
        chars
    }

    #[test]
    fn test_shuffle_keeps_length_and_letters() {
        let mut rng = SmallRng::seed_from_u64(1);
        let shuffled = shuffle_letter_runs("sternocléidomastoïdien", &mut rng);
        assert_eq!(shuffled.len(), 22);
        assert_eq!(
            sorted(shuffled),
            sorted("sternocléidomastoïdien".chars().collect())
        );
    }

    #[test]
    fn test_shuffle_keeps_non_letters_in_place() {
        let target = "arc de l'aorte";
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let shuffled = shuffle_letter_runs(target, &mut rng);
            for (i, ch) in target.chars().enumerate() {
                if !is_letter(ch) {
                    assert_eq!(shuffled[i], ch);
                }
            }
            // "l" is a run of its own, so it cannot move.
            assert_eq!(shuffled[7], 'l');
            assert_eq!(sorted(shuffled[9..14].to_vec()), sorted("aorte".chars().collect()));
        }
    }

    #[test]
    fn test_letters_never_cross_word_boundaries() {
        let target = "grand-dorsal";
        let mut rng = SmallRng::seed_from_u64(5);
        let shuffled = shuffle_letter_runs(target, &mut rng);
        assert_eq!(shuffled[5], '-');
        assert_eq!(sorted(shuffled[..5].to_vec()), sorted("grand".chars().collect()));
        assert_eq!(sorted(shuffled[6..].to_vec()), sorted("dorsal".chars().collect()));
    }

    #[test]
    fn test_shuffle_without_letters_is_identity() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert_eq!(shuffle_letter_runs("C7 - T1", &mut rng), vec!['C', '7', ' ', '-', ' ', 'T', '1']);
        assert!(shuffle_letter_runs("", &mut rng).is_empty());
    }

    #[test]
    fn test_shuffle_produces_more_than_one_order() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            seen.insert(shuffle_letter_runs("clavicule", &mut rng));
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_reveal_restores_order() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut puzzle = ScramblePuzzle::new("omoplate", &mut rng);
        assert!(!puzzle.is_revealed());
        puzzle.reveal();
        assert!(puzzle.is_revealed());
        assert_eq!(puzzle.display().iter().collect::<String>(), "omoplate");
    }
}
