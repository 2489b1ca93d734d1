use rand::Rng;
use rand::seq::SliceRandom;

use crate::lexicon::WordEntry;
use crate::puzzle::PuzzleError;

/// Pick a word uniformly from `pool`, avoiding `previous` when the pool
/// offers anything else.
///
/// A draw that repeats `previous` is retried at most `pool.len()` times; if
/// every retry lands on it again, the pick falls back to a uniform draw over
/// the entries that differ. The loop is bounded either way.
pub fn select_word<'a, R: Rng + ?Sized>(
    pool: &'a [WordEntry],
    previous: Option<&str>,
    rng: &mut R,
) -> Result<&'a WordEntry, PuzzleError> {
    let mut pick = pool.choose(rng).ok_or(PuzzleError::EmptyPool)?;
    let Some(previous) = previous else {
        return Ok(pick);
    };
    if pool.len() < 2 {
        return Ok(pick);
    }

    let mut redraws = 0;
    while pick.word == previous && redraws < pool.len() {
        pick = &pool[rng.gen_range(0..pool.len())];
        redraws += 1;
    }

    if pick.word == previous {
        let others: Vec<&WordEntry> = pool.iter().filter(|e| e.word != previous).collect();
        if let Some(other) = others.choose(rng) {
            pick = *other;
        }
    }

    Ok(pick)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;

    fn pool(words: &[&str]) -> Vec<WordEntry> {
        words
            .iter()
            .map(|w| WordEntry::new(w, &format!("définition de {w}")))
            .collect()
    }

    #[test]
    fn test_empty_pool_is_reported() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(select_word(&[], None, &mut rng), Err(PuzzleError::EmptyPool));
        assert_eq!(
            select_word(&[], Some("tibia"), &mut rng),
            Err(PuzzleError::EmptyPool)
        );
    }

    #[test]
    fn test_single_entry_pool_may_repeat() {
        let words = pool(&["tibia"]);
        let mut rng = SmallRng::seed_from_u64(0);
        let pick = select_word(&words, Some("tibia"), &mut rng).unwrap();
        assert_eq!(pick.word, "tibia");
    }

    #[test]
    fn test_never_repeats_previous_in_larger_pools() {
        let words = pool(&["tibia", "fibula", "fémur", "patella"]);
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut previous = select_word(&words, None, &mut rng).unwrap().word.clone();
        for _ in 0..500 {
            let pick = select_word(&words, Some(&previous), &mut rng).unwrap();
            assert_ne!(pick.word, previous);
            previous = pick.word.clone();
        }
    }

    #[test]
    fn test_two_word_pool_alternates() {
        let words = pool(&["cubitus", "radius"]);
        let mut rng = SmallRng::seed_from_u64(99);
        let mut previous = String::from("cubitus");
        for _ in 0..50 {
            let pick = select_word(&words, Some(&previous), &mut rng).unwrap();
            assert_ne!(pick.word, previous);
            previous = pick.word.clone();
        }
    }

    #[test]
    fn test_stuck_rng_still_terminates_with_other_word() {
        // A constant generator always draws index 0, the previous word.
        let words = pool(&["atlas", "axis", "sacrum"]);
        let mut rng = StepRng::new(0, 0);
        let pick = select_word(&words, Some("atlas"), &mut rng).unwrap();
        assert_ne!(pick.word, "atlas");
    }

    #[test]
    fn test_duplicates_of_previous_only_are_accepted() {
        let words = pool(&["coccyx", "coccyx"]);
        let mut rng = SmallRng::seed_from_u64(5);
        let pick = select_word(&words, Some("coccyx"), &mut rng).unwrap();
        assert_eq!(pick.word, "coccyx");
    }

    #[test]
    fn test_every_word_is_reachable() {
        let words = pool(&["malléole", "calcanéus", "talus", "naviculaire"]);
        let mut rng = SmallRng::seed_from_u64(8);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_word(&words, None, &mut rng).unwrap().word.clone());
        }
        assert_eq!(seen.len(), words.len());
    }
}
