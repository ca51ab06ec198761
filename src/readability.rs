//! Flesch Reading Ease over a flattened text blob.

use crate::parsers::text;
use regex::Regex;
use std::sync::LazyLock;

/// Score returned when the text has no sentences or no words
pub const NEUTRAL_SCORE: u8 = 50;

static VOWEL_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[aeiouy]+").expect("vowel pattern should be valid"));

/// `206.835 - 1.015 * words/sentence - 84.6 * syllables/word`, clamped to
/// [0, 100] and rounded
pub fn score(content: &str) -> u8 {
    let sentences = text::sentences(content).len();
    let words = text::words(content).collect::<Vec<_>>();

    if sentences == 0 || words.is_empty() {
        return NEUTRAL_SCORE;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    ease.clamp(0.0, 100.0).round() as u8
}

/// Vowel groups in the word, at least one
pub fn count_syllables(word: &str) -> usize {
    VOWEL_GROUP.find_iter(&word.to_lowercase()).count().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(score(""), 50);
        assert_eq!(score("   \n\n "), 50);
        assert_eq!(score("?!..."), 50);
    }

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("psst"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("READABILITY"), 5);
        assert_eq!(count_syllables("42"), 1);
    }

    #[test]
    fn test_simple_text_scores_high() {
        // 6 words, 2 sentences, 6 syllables: 206.835 - 3.045 - 84.6 = 119.19 -> 100
        assert_eq!(score("The cat sat. The dog ran."), 100);
    }

    #[test]
    fn test_known_value() {
        // 4 words, 1 sentence, 8 syllables:
        // 206.835 - 1.015 * 4 - 84.6 * 2 = 3.575 -> 4
        assert_eq!(score("Extraordinary communication happens rapidly."), 4);
    }

    #[test]
    fn test_dense_text_clamps_to_zero() {
        let text = "Incomprehensibilities notwithstanding, institutionalization \
                    characteristically overcomplicates organizational \
                    responsibilities";
        assert_eq!(score(text), 0);
    }
}
