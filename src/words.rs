use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

static DATA_DIR: Dir = include_dir!("src/data");

/// A session is always five rounds long.
pub const ROUNDS_PER_SESSION: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Difficult,
    Expert,
}

impl Difficulty {
    /// Word length for each of the five rounds, in order.
    pub fn length_sequence(self) -> [usize; ROUNDS_PER_SESSION] {
        match self {
            Difficulty::Easy => [5, 5, 6, 6, 7],
            Difficulty::Difficult => [5, 6, 6, 6, 7],
            Difficulty::Expert => [5, 6, 6, 7, 7],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    #[error("no {length}-letter words available for {difficulty} difficulty")]
    DataUnavailable {
        difficulty: Difficulty,
        length: usize,
    },

    #[error("word data is malformed: {0}")]
    Malformed(String),
}

/// Categorized word lists, keyed by difficulty and then by a length label
/// such as "5_letters". Immutable after load.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct WordBank {
    lists: HashMap<String, HashMap<String, Vec<String>>>,
}

impl WordBank {
    /// Load the word lists embedded in the binary.
    pub fn bundled() -> Result<Self, WordError> {
        let file = DATA_DIR
            .get_file("lingo_words.json")
            .ok_or_else(|| WordError::Malformed("lingo_words.json missing".into()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordError::Malformed("lingo_words.json is not utf-8".into()))?;
        Self::from_json(contents)
    }

    /// Parse a word bank from its JSON representation, keeping only
    /// lowercase alphabetic words whose length matches their list label.
    pub fn from_json(data: &str) -> Result<Self, WordError> {
        let mut bank: WordBank =
            serde_json::from_str(data).map_err(|e| WordError::Malformed(e.to_string()))?;

        for lists in bank.lists.values_mut() {
            for (label, words) in lists.iter_mut() {
                let expected = label_length(label);
                words.retain(|w| {
                    w.chars().all(|c| c.is_ascii_lowercase())
                        && expected.map_or(true, |len| w.len() == len)
                });
            }
        }

        Ok(bank)
    }

    /// The candidate list for a difficulty and word length.
    pub fn words_for(&self, difficulty: Difficulty, length: usize) -> Result<&[String], WordError> {
        let unavailable = || WordError::DataUnavailable { difficulty, length };

        let words = self
            .lists
            .get(&difficulty.to_string())
            .and_then(|lists| lists.get(&format!("{length}_letters")))
            .ok_or_else(unavailable)?;

        if words.is_empty() {
            return Err(unavailable());
        }
        Ok(words)
    }

    /// One word drawn uniformly at random from the matching list.
    pub fn random_word(&self, difficulty: Difficulty, length: usize) -> Result<&str, WordError> {
        let words = self.words_for(difficulty, length)?;
        words
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or(WordError::DataUnavailable { difficulty, length })
    }

    /// The five words for a new session, one per round.
    pub fn draw_sequence(&self, difficulty: Difficulty) -> Result<Vec<String>, WordError> {
        difficulty
            .length_sequence()
            .iter()
            .map(|&len| self.random_word(difficulty, len).map(str::to_string))
            .collect()
    }
}

fn label_length(label: &str) -> Option<usize> {
    label.split('_').next().and_then(|n| n.parse().ok())
}
