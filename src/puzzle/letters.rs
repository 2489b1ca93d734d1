use std::borrow::Cow;

use icu_normalizer::ComposingNormalizerBorrowed;

/// NFC-compose `text` so that `e` + U+0301 and a precomposed `é` compare equal.
pub fn nfc(text: &str) -> Cow<'_, str> {
    ComposingNormalizerBorrowed::new_nfc().normalize(text)
}

/// Letters are what scramble mode shuffles. Accented Latin letters count.
pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

/// Characters flashcard mode hides behind the placeholder. Spaces and
/// punctuation such as `'` or `-` stay visible.
pub fn is_concealable(ch: char) -> bool {
    ch.is_alphanumeric()
}

pub fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    nfc(a).to_lowercase() == nfc(b).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_composes_combining_accent() {
        let decomposed = "hume\u{301}rus";
        assert_eq!(nfc(decomposed), "humérus");
        assert_eq!(nfc(decomposed).chars().count(), 7);
    }

    #[test]
    fn test_accented_letters_are_letters() {
        for ch in ['é', 'è', 'ï', 'ç', 'Œ', 'ø', 'ß'] {
            assert!(is_letter(ch), "{ch} should be a letter");
        }
        for ch in [' ', '\'', '-', '.', '7'] {
            assert!(!is_letter(ch), "{ch:?} should not be a letter");
        }
    }

    #[test]
    fn test_digits_are_concealable_but_punctuation_is_not() {
        assert!(is_concealable('7'));
        assert!(is_concealable('é'));
        assert!(!is_concealable(' '));
        assert!(!is_concealable('\''));
        assert!(!is_concealable('-'));
    }

    #[test]
    fn test_same_letter_ignores_case_not_accents() {
        assert!(same_letter('É', 'é'));
        assert!(same_letter('u', 'U'));
        assert!(!same_letter('e', 'é'));
    }

    #[test]
    fn test_eq_ignore_case_normalizes_first() {
        assert!(eq_ignore_case("HUME\u{301}RUS", "humérus"));
        assert!(!eq_ignore_case("humerus", "humérus"));
    }
}
