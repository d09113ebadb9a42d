use std::collections::HashMap;

/// Per-position verdict for one letter of a submitted guess.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LetterScore {
    /// Right letter in the right position.
    Correct,
    /// Letter occurs elsewhere in the target, accounting for multiplicity.
    Present,
    /// Letter does not occur in any unconsumed target position.
    Absent,
}

/// One score per position, same length as the guessed word. Immutable once
/// produced.
pub type AttemptFeedback = Vec<LetterScore>;

/// Score a guess against the target word.
///
/// Two passes: exact position matches first, each consuming its target
/// position; then the remaining guess letters scan the unconsumed target
/// letters, leftmost occurrence first. A guess with two of the same letter
/// only earns two non-Absent labels if the target has two occurrences.
///
/// Pure function of its inputs; the caller guarantees equal lengths.
pub fn evaluate(target: &str, guess: &str) -> AttemptFeedback {
    let target: Vec<char> = target.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    debug_assert_eq!(target.len(), guess.len());

    let mut feedback = vec![LetterScore::Absent; guess.len()];
    let mut counter = LetterCounter::new();

    for (i, (&g, &t)) in guess.iter().zip(target.iter()).enumerate() {
        if g == t {
            feedback[i] = LetterScore::Correct;
        } else {
            counter.push(t);
        }
    }

    for (i, &g) in guess.iter().enumerate() {
        if feedback[i] == LetterScore::Correct {
            continue;
        }
        if counter.pop(g) {
            feedback[i] = LetterScore::Present;
        }
    }

    feedback
}

/// Multiset of the target letters not consumed by an exact match.
struct LetterCounter {
    letters: HashMap<char, u32>,
}

impl LetterCounter {
    fn new() -> LetterCounter {
        LetterCounter {
            letters: HashMap::new(),
        }
    }

    fn push(&mut self, letter: char) {
        self.letters
            .entry(letter)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn pop(&mut self, letter: char) -> bool {
        if let Some(count) = self.letters.get_mut(&letter) {
            *count -= 1;

            if *count == 0 {
                self.letters.remove(&letter);
            }

            true
        } else {
            false
        }
    }
}
