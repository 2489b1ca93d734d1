/// Running tally for the current process. Not persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub attempts: u32,
    pub hints: u32,
}

impl Score {
    pub fn record_guess(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn record_hint(&mut self) {
        self.hints += 1;
    }

    /// Success rate as a percentage, 0 before the first attempt.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.correct as f64 / self.attempts as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_starts_at_zero() {
        assert_eq!(Score::default().success_rate(), 0.0);
    }

    #[test]
    fn test_record_guess() {
        let mut score = Score::default();
        score.record_guess(true);
        score.record_guess(false);
        score.record_guess(true);
        score.record_guess(true);
        assert_eq!(score.correct, 3);
        assert_eq!(score.attempts, 4);
        assert_eq!(score.success_rate(), 75.0);
    }
}
