use log::debug;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("you've already used your hint for this round")]
    HintExhausted,

    #[error("there are no unknown letters left to reveal")]
    NoUnknownPositions,

    #[error("the game is paused")]
    SessionPaused,

    #[error("no round is in progress")]
    NotPlaying,
}

/// Tracks hint reveals for a whole session.
///
/// Reveals are keyed by round index so that a letter revealed in round N
/// carries into round N+1 when the new word happens to share that letter at
/// that position. The carry costs nothing; each round still has its own
/// one-hint budget.
#[derive(Debug, Default)]
pub struct HintLedger {
    revealed: HashMap<usize, HashMap<usize, char>>,
    spent: HashSet<usize>,
}

impl HintLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a round, carrying forward any reveal from the previous round
    /// that coincides with the new word.
    pub fn begin_round(&mut self, round: usize, word: &str) {
        let carried: Vec<(usize, char)> = round
            .checked_sub(1)
            .and_then(|prev| self.revealed.get(&prev))
            .map(|prev_reveals| {
                prev_reveals
                    .iter()
                    .filter(|&(&pos, &letter)| word.chars().nth(pos) == Some(letter))
                    .map(|(&pos, &letter)| (pos, letter))
                    .collect()
            })
            .unwrap_or_default();

        for (pos, letter) in carried {
            debug!("carrying hint '{letter}' at position {pos} into round {round}");
            self.revealed.entry(round).or_default().insert(pos, letter);
        }
    }

    /// Whether this round's hint budget has been spent.
    pub fn spent_in(&self, round: usize) -> bool {
        self.spent.contains(&round)
    }

    /// Letters revealed for a round, by position.
    pub fn revealed_in(&self, round: usize) -> HashMap<usize, char> {
        self.revealed.get(&round).cloned().unwrap_or_default()
    }

    /// Reveal one unknown position of `word`, chosen uniformly at random.
    ///
    /// Position 0 is always pre-known and never a hint target. Positions
    /// already guessed Correct this round or already revealed are not
    /// candidates either.
    pub fn grant(
        &mut self,
        round: usize,
        word: &str,
        known_correct: &HashSet<usize>,
    ) -> Result<(usize, char), HintError> {
        if self.spent_in(round) {
            return Err(HintError::HintExhausted);
        }

        let already_revealed = self.revealed_in(round);
        let length = word.chars().count();
        let candidates: Vec<usize> = (1..length)
            .filter(|pos| !known_correct.contains(pos) && !already_revealed.contains_key(pos))
            .collect();

        let Some(&pos) = candidates.choose(&mut rand::thread_rng()) else {
            return Err(HintError::NoUnknownPositions);
        };

        // candidate positions are always in bounds for `word`
        let letter = word.chars().nth(pos).ok_or(HintError::NoUnknownPositions)?;
        self.revealed.entry(round).or_default().insert(pos, letter);
        self.spent.insert(round);
        debug!("hint granted: '{letter}' at position {pos} in round {round}");

        Ok((pos, letter))
    }

    pub fn clear(&mut self) {
        self.revealed.clear();
        self.spent.clear();
    }
}
