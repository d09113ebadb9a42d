use std::collections::HashSet;
use thiserror::Error;

/// Verdict from the word-validity collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WordValidity {
    Valid,
    Invalid,
}

/// Failure to perform the check at all, distinct from a rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("couldn't reach the dictionary: {0}")]
    Unavailable(String),
}

/// Yes/no word-validity check.
///
/// The engine only needs this contract. Frontends can plug in a live
/// dictionary service, while the bundled build and the tests stay offline.
pub trait DictionaryChecker: Send + Sync {
    fn check(&self, word: &str) -> Result<WordValidity, DictionaryError>;
}

static DICTIONARY_WORDS: &str = include_str!("data/dictionary.txt");

/// Offline checker over the word list embedded in the binary.
pub struct BundledDictionary {
    words: HashSet<String>,
}

impl BundledDictionary {
    pub fn new() -> Self {
        let words = DICTIONARY_WORDS
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for BundledDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryChecker for BundledDictionary {
    fn check(&self, word: &str) -> Result<WordValidity, DictionaryError> {
        if self.words.contains(&word.to_lowercase()) {
            Ok(WordValidity::Valid)
        } else {
            Ok(WordValidity::Invalid)
        }
    }
}
