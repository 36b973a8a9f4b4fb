//! Human-readable passphrase generation
//!
//! Composes dictionary words, two digits, and separator characters into a
//! passphrase that is easy to read over the phone but still mixes character
//! classes: `4Lobster-ORCHARD!plume87`. The word dictionary is supplied by
//! the caller; this module only does the composition.

use rand::Rng;
use rand::seq::{IndexedRandom, index};
use thiserror::Error;

/// Characters eligible as word separators.
const SEPARATOR_CHARACTERS: &str = "!@$%^&*-_+=:|~?/.;";

/// Default number of words in a generated passphrase.
pub const DEFAULT_WORD_COUNT: usize = 3;

/// Errors from passphrase generation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PassphraseError {
    /// Fewer than two words requested
    #[error("a passphrase needs at least two words, requested {requested}")]
    TooFewWords {
        /// Number of words requested
        requested: usize,
    },

    /// The word list cannot supply enough distinct words
    #[error("word list holds {available} words, requested {requested} distinct ones")]
    WordListExhausted {
        /// Number of words in the list
        available: usize,
        /// Number of words requested
        requested: usize,
    },

    /// More separators requested than distinct separator characters exist
    #[error("cannot place {requested} distinct separators, only {available} available")]
    SeparatorsExhausted {
        /// Number of separator characters available
        available: usize,
        /// Number of separators needed
        requested: usize,
    },
}

/// Generates passphrases from an injected word list.
#[derive(Debug, Clone)]
pub struct PassphraseGenerator {
    words: Vec<String>,
}

impl PassphraseGenerator {
    /// Create a generator over the given word list.
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Number of words available to the generator.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Generate a passphrase with [`DEFAULT_WORD_COUNT`] words.
    pub fn generate(&self) -> Result<String, PassphraseError> {
        self.generate_with(DEFAULT_WORD_COUNT)
    }

    /// Generate a passphrase with `word_count` words.
    ///
    /// The result is `<digit><word><sep>…<sep><word><digit>`: two distinct
    /// numbers in 1..=98 bracket the words, every separator is a distinct
    /// draw from the separator set, and each word is independently
    /// capitalized, lowercased, or uppercased.
    pub fn generate_with(&self, word_count: usize) -> Result<String, PassphraseError> {
        if word_count < 2 {
            return Err(PassphraseError::TooFewWords {
                requested: word_count,
            });
        }
        if word_count > self.words.len() {
            return Err(PassphraseError::WordListExhausted {
                available: self.words.len(),
                requested: word_count,
            });
        }
        let separator_pool: Vec<char> = SEPARATOR_CHARACTERS.chars().collect();
        if word_count - 1 > separator_pool.len() {
            return Err(PassphraseError::SeparatorsExhausted {
                available: separator_pool.len(),
                requested: word_count - 1,
            });
        }

        let mut rng = rand::rng();

        let numbers = index::sample(&mut rng, 98, 2);
        let separators: Vec<char> = separator_pool
            .choose_multiple(&mut rng, word_count - 1)
            .copied()
            .collect();
        let selected: Vec<&String> = self.words.choose_multiple(&mut rng, word_count).collect();

        let mut passphrase = (numbers.index(0) + 1).to_string();
        for (word, separator) in selected.iter().zip(&separators) {
            passphrase.push_str(&transform_word(word, &mut rng));
            passphrase.push(*separator);
        }
        passphrase.push_str(&transform_word(selected[word_count - 1], &mut rng));
        passphrase.push_str(&(numbers.index(1) + 1).to_string());

        Ok(passphrase)
    }
}

/// Randomly capitalize, lowercase, or uppercase a word.
fn transform_word(word: &str, rng: &mut impl Rng) -> String {
    match rng.random_range(0..3) {
        0 => capitalize(word),
        1 => word.to_lowercase(),
        _ => word.to_uppercase(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> PassphraseGenerator {
        PassphraseGenerator::new(
            ["lobster", "orchard", "plume", "anvil", "cinder", "mantis"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[test]
    fn rejects_fewer_than_two_words() {
        let err = generator().generate_with(1).unwrap_err();
        assert_eq!(err, PassphraseError::TooFewWords { requested: 1 });
    }

    #[test]
    fn rejects_more_words_than_the_list_holds() {
        let err = generator().generate_with(7).unwrap_err();
        assert_eq!(
            err,
            PassphraseError::WordListExhausted {
                available: 6,
                requested: 7,
            }
        );
    }

    #[test]
    fn rejects_word_counts_that_exhaust_separators() {
        let words: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let generator = PassphraseGenerator::new(words);
        let err = generator.generate_with(25).unwrap_err();
        assert_eq!(
            err,
            PassphraseError::SeparatorsExhausted {
                available: 18,
                requested: 24,
            }
        );
    }

    #[test]
    fn passphrase_starts_and_ends_with_numbers() {
        let passphrase = generator().generate().unwrap();
        assert!(passphrase.chars().next().unwrap().is_ascii_digit());
        assert!(passphrase.chars().last().unwrap().is_ascii_digit());
    }

    #[test]
    fn passphrase_contains_requested_separator_count() {
        let passphrase = generator().generate_with(4).unwrap();
        let separator_count = passphrase
            .chars()
            .filter(|c| SEPARATOR_CHARACTERS.contains(*c))
            .count();
        assert_eq!(separator_count, 3);
    }

    #[test]
    fn separators_are_distinct() {
        let passphrase = generator().generate_with(5).unwrap();
        let separators: Vec<char> = passphrase
            .chars()
            .filter(|c| SEPARATOR_CHARACTERS.contains(*c))
            .collect();
        let mut deduped = separators.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(separators.len(), deduped.len());
    }

    #[test]
    fn words_come_from_the_list() {
        let generator = generator();
        let passphrase = generator.generate().unwrap();
        let lowered = passphrase.to_lowercase();
        let used = generator
            .words
            .iter()
            .filter(|word| lowered.contains(word.as_str()))
            .count();
        assert_eq!(used, DEFAULT_WORD_COUNT);
    }

    #[test]
    fn capitalize_handles_mixed_case_input() {
        assert_eq!(capitalize("lObStEr"), "Lobster");
        assert_eq!(capitalize(""), "");
    }
}
